//! Backend configuration.

use std::env;
use std::fmt;

use uuid::Uuid;

use crate::error::NotifyError;

/// Environment variable holding the Notify API key.
pub const API_KEY_VAR: &str = "GOVUK_NOTIFY_API_KEY";
/// Environment variable holding the default plain-text template id.
pub const PLAIN_TEMPLATE_VAR: &str = "GOVUK_NOTIFY_PLAIN_EMAIL_TEMPLATE_ID";
/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "GOVUK_NOTIFY_BASE_URL";

/// Settings for a [`NotifyBackend`](crate::NotifyBackend).
///
/// The plain template must exist on the Notify service and render the
/// `((subject))` and `((body))` placeholders.
///
/// ```
/// use missive_notify::NotifyConfig;
///
/// let config = NotifyConfig::new(
///     "my_key-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0",
///     "9d3c7a37-6b1c-4f4e-9d0b-2f6d0a1c5e11",
/// );
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Notify API key.
    pub api_key: String,
    /// Template used for messages without a custom template id.
    pub plain_template_id: String,
    /// Custom API base URL (for testing or a non-production Notify).
    pub base_url: Option<String>,
}

impl NotifyConfig {
    pub fn new(api_key: impl Into<String>, plain_template_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            plain_template_id: plain_template_id.into(),
            base_url: None,
        }
    }

    /// Set a custom base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Read `GOVUK_NOTIFY_API_KEY`, `GOVUK_NOTIFY_PLAIN_EMAIL_TEMPLATE_ID`
    /// and, optionally, `GOVUK_NOTIFY_BASE_URL`.
    pub fn from_env() -> Result<Self, NotifyError> {
        let api_key = env::var(API_KEY_VAR)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", API_KEY_VAR)))?;
        let plain_template_id = env::var(PLAIN_TEMPLATE_VAR)
            .map_err(|_| NotifyError::Configuration(format!("{} not set", PLAIN_TEMPLATE_VAR)))?;

        let mut config = Self::new(api_key, plain_template_id);
        if let Ok(base_url) = env::var(BASE_URL_VAR) {
            config = config.base_url(base_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the API key is present and the plain template id is a UUID.
    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.api_key.trim().is_empty() {
            return Err(NotifyError::Configuration(format!(
                "{} is empty",
                API_KEY_VAR
            )));
        }
        if Uuid::parse_str(&self.plain_template_id).is_err() {
            return Err(NotifyError::Configuration(format!(
                "{} must be a UUID string, got '{}'",
                PLAIN_TEMPLATE_VAR, self.plain_template_id
            )));
        }
        Ok(())
    }
}

// Keep the API key out of logs.
impl fmt::Debug for NotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyConfig")
            .field("api_key", &"<redacted>")
            .field("plain_template_id", &self.plain_template_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}
