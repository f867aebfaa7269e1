//! Email attachments.
//!
//! Notify cannot deliver attachments. The type exists so a generic
//! [`Email`](crate::Email) can carry them, and so the converter can refuse
//! them.

use serde::{Deserialize, Serialize};

/// An email attachment.
///
/// ```
/// use missive_notify::Attachment;
///
/// let attachment = Attachment::from_bytes("report.pdf", b"PDF content".to_vec());
/// assert_eq!(attachment.content_type, "application/pdf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Filename for the attachment
    pub filename: String,
    /// MIME content type (e.g., "application/pdf", "image/png")
    pub content_type: String,
    /// Raw attachment data
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create a new attachment from raw bytes.
    ///
    /// Content type is guessed from the filename extension.
    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();

        Self {
            filename,
            content_type,
            data,
        }
    }
}
