//! Provider client trait and delivery result types.
//!
//! # Why `async_trait`?
//!
//! [`NotifyBackend`](crate::NotifyBackend) stores its client as
//! `Arc<dyn NotifyClient>` so the real API client, the in-memory
//! [`LocalClient`](crate::providers::LocalClient) and user-supplied test
//! doubles are interchangeable at runtime. Native async traits are not object
//! safe; `#[async_trait]` boxes the future instead. One allocation per
//! provider call is unmeasurable next to the HTTP round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::message::NotifyRequest;

/// Result of one successful provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Notification id assigned by the provider
    pub notification_id: String,
    /// Optional provider-specific response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_response: Option<serde_json::Value>,
}

impl DeliveryResult {
    /// Create a new delivery result with just a notification id.
    pub fn new(notification_id: impl Into<String>) -> Self {
        Self {
            notification_id: notification_id.into(),
            provider_response: None,
        }
    }

    /// Create a delivery result with provider response.
    pub fn with_response(notification_id: impl Into<String>, response: serde_json::Value) -> Self {
        Self {
            notification_id: notification_id.into(),
            provider_response: Some(response),
        }
    }
}

/// A client able to send one email notification to one recipient.
///
/// # Example
///
/// ```ignore
/// use missive_notify::{NotifyClient, NotifyRequest};
/// use missive_notify::providers::NotifyApiClient;
///
/// let client = NotifyApiClient::new(api_key)?;
/// let result = client
///     .send_email_notification("user@example.com", &request)
///     .await?;
/// println!("Sent with ID: {}", result.notification_id);
/// ```
#[async_trait]
pub trait NotifyClient: Send + Sync {
    /// Send `request` to a single `email_address`.
    async fn send_email_notification(
        &self,
        email_address: &str,
        request: &NotifyRequest,
    ) -> Result<DeliveryResult, NotifyError>;

    /// Get the provider name (for logging/debugging).
    fn provider_name(&self) -> &'static str {
        "unknown"
    }
}

#[async_trait]
impl<C: NotifyClient + ?Sized> NotifyClient for std::sync::Arc<C> {
    async fn send_email_notification(
        &self,
        email_address: &str,
        request: &NotifyRequest,
    ) -> Result<DeliveryResult, NotifyError> {
        (**self).send_email_notification(email_address, request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
