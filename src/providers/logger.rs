//! Logger client that only logs notifications.
//!
//! Useful for staging environments or when you want to see what would be sent
//! without calling Notify.

use async_trait::async_trait;

use crate::client::{DeliveryResult, NotifyClient};
use crate::error::NotifyError;
use crate::message::NotifyRequest;

/// Logger client that emits tracing events for notifications.
#[derive(Debug, Clone, Default)]
pub struct LoggerClient {
    /// If true, log personalisation values too.
    log_full: bool,
}

impl LoggerClient {
    /// Create a logger client with brief output (recipient and template).
    pub fn new() -> Self {
        Self { log_full: false }
    }

    /// Create a logger client that also logs personalisation.
    pub fn full() -> Self {
        Self { log_full: true }
    }

    pub fn log_full(mut self, full: bool) -> Self {
        self.log_full = full;
        self
    }
}

#[async_trait]
impl NotifyClient for LoggerClient {
    async fn send_email_notification(
        &self,
        email_address: &str,
        request: &NotifyRequest,
    ) -> Result<DeliveryResult, NotifyError> {
        let notification_id = uuid::Uuid::new_v4().to_string();

        if self.log_full {
            tracing::info!(
                notification_id = %notification_id,
                email_address = %email_address,
                template_id = %request.template_id,
                email_reply_to_id = ?request.email_reply_to_id,
                personalisation = %serde_json::to_string(&request.personalisation)?,
                "Notification logged (full)"
            );
        } else {
            tracing::info!(
                notification_id = %notification_id,
                email_address = %email_address,
                template_id = %request.template_id,
                "Notification logged"
            );
        }

        Ok(DeliveryResult::new(notification_id))
    }

    fn provider_name(&self) -> &'static str {
        "logger"
    }
}
