//! Conversion of generic emails into Notify messages.
//!
//! Framework helpers such as [`send_mail`](crate::send_mail) always fill in a
//! sender address, and may add headers or reply-to addresses. Notify cannot
//! use any of them, so they are dropped silently here rather than refused.
//! CC, BCC and attachments would change who receives what, so those still
//! fail the conversion.

use crate::email::Email;
use crate::error::NotifyError;
use crate::message::NotifyMessage;

/// Anything a [`NotifyBackend`](crate::NotifyBackend) can send.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Already in Notify shape; passed through unchanged.
    Notify(NotifyMessage),
    /// A conventional email, converted on the way out.
    Email(Email),
}

impl From<NotifyMessage> for Outbound {
    fn from(message: NotifyMessage) -> Self {
        Self::Notify(message)
    }
}

impl From<Email> for Outbound {
    fn from(email: Email) -> Self {
        Self::Email(email)
    }
}

impl TryFrom<Email> for NotifyMessage {
    type Error = NotifyError;

    fn try_from(email: Email) -> Result<Self, Self::Error> {
        if email.html_body.is_some() {
            tracing::debug!("Dropping HTML body; Notify renders its own HTML");
        }

        NotifyMessage::builder()
            .subject(email.subject)
            .body(email.text_body.unwrap_or_default())
            .put_to(email.to)
            .put_cc(email.cc)
            .put_bcc(email.bcc)
            .put_attachments(email.attachments)
            .build()
    }
}

/// Convert `message` into a [`NotifyMessage`].
///
/// Returns `Ok(None)` when the conversion fails and `fail_silently` is set:
/// there is no usable message for that item.
///
/// ```
/// use missive_notify::{into_notify_message, Email};
///
/// let email = Email::new()
///     .from("webmaster@example.com")
///     .to("user@example.com")
///     .subject("Hello")
///     .text_body("Body goes here");
///
/// let message = into_notify_message(email, false).unwrap().unwrap();
/// assert_eq!(message.subject(), "Hello");
/// ```
pub fn into_notify_message(
    message: impl Into<Outbound>,
    fail_silently: bool,
) -> Result<Option<NotifyMessage>, NotifyError> {
    match message.into() {
        Outbound::Notify(message) => Ok(Some(message)),
        Outbound::Email(email) => match NotifyMessage::try_from(email) {
            Ok(message) => Ok(Some(message)),
            Err(e) if fail_silently => {
                tracing::warn!(error = %e, "Dropping email that cannot be sent through Notify");
                Ok(None)
            }
            Err(e) => Err(e),
        },
    }
}
