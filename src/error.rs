//! Error types for missive-notify.

use thiserror::Error;

/// Errors that can occur when building or sending notifications.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Configuration error (missing env var, malformed API key, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A field Notify cannot carry was set on a message.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Inconsistent subject/body/template/personalisation combination.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An identifier was supplied as something other than a string.
    #[error("{field} must be a UUID string")]
    InvalidType { field: &'static str },

    /// An identifier string is not a valid UUID.
    #[error("{field} must be a UUID string, got '{value}'")]
    InvalidIdentifier { field: &'static str, value: String },

    /// Invalid email address format.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Error sending the notification.
    #[error("Send error: {0}")]
    SendError(String),

    /// Provider-specific error with details.
    #[error("Provider error ({provider}): {message}")]
    ProviderError {
        provider: &'static str,
        message: String,
        /// Optional HTTP status code
        status: Option<u16>,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Signing the API bearer token failed.
    #[error("Token error: {0}")]
    TokenError(String),
}

impl NotifyError {
    /// Create a provider-specific error.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: None,
        }
    }

    /// Create a provider error with HTTP status.
    pub fn provider_with_status(
        provider: &'static str,
        message: impl Into<String>,
        status: u16,
    ) -> Self {
        Self::ProviderError {
            provider,
            message: message.into(),
            status: Some(status),
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<jsonwebtoken::errors::Error> for NotifyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::TokenError(err.to_string())
    }
}
