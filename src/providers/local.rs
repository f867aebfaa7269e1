//! Local client for development and testing.
//!
//! Records every notification in memory instead of calling Notify, for
//! programmatic assertions in tests or for inspecting what would be sent.
//!
//! # Testing Usage
//!
//! ```rust,ignore
//! use missive_notify::providers::LocalClient;
//! use missive_notify::{NotifyBackend, NotifyConfig};
//!
//! #[tokio::test]
//! async fn test_sends_welcome_email() {
//!     let client = LocalClient::new();
//!     let backend = NotifyBackend::with_client(config(), client.clone());
//!
//!     // Code under test
//!     send_welcome_email(&backend, "user@example.com").await;
//!
//!     assert!(client.sent_to("user@example.com"));
//! }
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::{DeliveryResult, NotifyClient};
use crate::error::NotifyError;
use crate::message::NotifyRequest;
use crate::storage::{MemoryStorage, Storage, StoredNotification};

#[derive(Debug, Default)]
struct Failures {
    /// Every call fails with this message.
    all: Option<String>,
    /// Calls for these (lowercased) addresses fail.
    by_address: HashMap<String, String>,
}

/// Local client that stores notifications in memory.
///
/// Clones share both the storage and the failure settings, so a test can keep
/// one handle while a [`NotifyBackend`](crate::NotifyBackend) owns another.
#[derive(Debug, Clone)]
pub struct LocalClient {
    storage: Arc<MemoryStorage>,
    failures: Arc<RwLock<Failures>>,
}

impl LocalClient {
    /// Create a new local client with fresh storage.
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::shared())
    }

    /// Create a local client with existing storage.
    pub fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        Self {
            storage,
            failures: Arc::new(RwLock::new(Failures::default())),
        }
    }

    /// Get a reference to the underlying storage.
    pub fn storage(&self) -> Arc<MemoryStorage> {
        Arc::clone(&self.storage)
    }

    // =========================================================================
    // Failure Simulation (for testing)
    // =========================================================================

    /// Make every call fail with `message`.
    ///
    /// ```rust,ignore
    /// let client = LocalClient::new();
    /// client.set_failure("Notify is down");
    /// ```
    pub fn set_failure(&self, message: impl Into<String>) {
        self.failures.write().all = Some(message.into());
    }

    /// Make calls for one recipient fail with `message`.
    pub fn fail_for(&self, email_address: &str, message: impl Into<String>) {
        self.failures
            .write()
            .by_address
            .insert(email_address.to_ascii_lowercase(), message.into());
    }

    /// Clear all failure settings.
    pub fn clear_failure(&self) {
        let mut failures = self.failures.write();
        failures.all = None;
        failures.by_address.clear();
    }

    fn failure_for(&self, email_address: &str) -> Option<String> {
        let failures = self.failures.read();
        failures.all.clone().or_else(|| {
            failures
                .by_address
                .get(&email_address.to_ascii_lowercase())
                .cloned()
        })
    }

    // =========================================================================
    // Notification Access (for testing assertions)
    // =========================================================================

    /// Get all recorded notifications (newest first).
    pub fn notifications(&self) -> Vec<StoredNotification> {
        self.storage.all()
    }

    /// Get the most recent notification.
    pub fn last_notification(&self) -> Option<StoredNotification> {
        self.storage.all().into_iter().next()
    }

    pub fn notification_count(&self) -> usize {
        self.storage.count()
    }

    pub fn has_notifications(&self) -> bool {
        self.storage.count() > 0
    }

    /// Clear all recorded notifications.
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Remove and return all recorded notifications.
    pub fn flush(&self) -> Vec<StoredNotification> {
        self.storage.flush()
    }

    /// Check if a notification was sent to a specific address.
    pub fn sent_to(&self, email_address: &str) -> bool {
        self.storage
            .all()
            .iter()
            .any(|stored| stored.email_address.eq_ignore_ascii_case(email_address))
    }

    /// Check if a notification used a specific template.
    pub fn sent_with_template(&self, template_id: &str) -> bool {
        self.storage
            .all()
            .iter()
            .any(|stored| stored.request.template_id == template_id)
    }

    /// Find notifications matching a predicate.
    pub fn find_notifications<F>(&self, predicate: F) -> Vec<StoredNotification>
    where
        F: Fn(&StoredNotification) -> bool,
    {
        self.storage
            .all()
            .into_iter()
            .filter(|stored| predicate(stored))
            .collect()
    }
}

impl Default for LocalClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotifyClient for LocalClient {
    async fn send_email_notification(
        &self,
        email_address: &str,
        request: &NotifyRequest,
    ) -> Result<DeliveryResult, NotifyError> {
        if let Some(message) = self.failure_for(email_address) {
            return Err(NotifyError::SendError(message));
        }

        let id = self.storage.push(email_address, request.clone());
        Ok(DeliveryResult::new(id))
    }

    fn provider_name(&self) -> &'static str {
        "local"
    }
}
