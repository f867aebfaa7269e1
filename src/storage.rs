//! Storage trait and implementations for the local client.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::message::NotifyRequest;

/// A recorded notification with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNotification {
    /// Unique identifier for this notification.
    pub id: String,
    /// The recipient the call was made for.
    pub email_address: String,
    /// The request record that was sent.
    pub request: NotifyRequest,
    /// When the notification was "sent" (stored).
    pub sent_at: DateTime<Utc>,
}

/// Trait for notification storage backends.
pub trait Storage: Send + Sync {
    /// Store a notification and return its ID.
    fn push(&self, email_address: &str, request: NotifyRequest) -> String;

    /// Pop and return the most recent notification.
    fn pop(&self) -> Option<StoredNotification>;

    /// Get a notification by ID.
    fn get(&self, id: &str) -> Option<StoredNotification>;

    /// Get all stored notifications, newest first.
    fn all(&self) -> Vec<StoredNotification>;

    /// Delete a notification by ID.
    fn delete(&self, id: &str) -> bool;

    /// Clear all stored notifications.
    fn clear(&self);

    /// Get the count of stored notifications.
    fn count(&self) -> usize;

    /// Remove and return all stored notifications, newest first.
    fn flush(&self) -> Vec<StoredNotification>;
}

/// Thread-safe in-memory storage, oldest first internally.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    notifications: RwLock<Vec<StoredNotification>>,
}

impl MemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage wrapped in an Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Storage for MemoryStorage {
    fn push(&self, email_address: &str, request: NotifyRequest) -> String {
        let id = uuid::Uuid::new_v4().to_string();

        self.notifications.write().push(StoredNotification {
            id: id.clone(),
            email_address: email_address.to_string(),
            request,
            sent_at: Utc::now(),
        });

        id
    }

    fn pop(&self) -> Option<StoredNotification> {
        self.notifications.write().pop()
    }

    fn get(&self, id: &str) -> Option<StoredNotification> {
        self.notifications
            .read()
            .iter()
            .find(|stored| stored.id == id)
            .cloned()
    }

    fn all(&self) -> Vec<StoredNotification> {
        self.notifications.read().iter().rev().cloned().collect()
    }

    fn delete(&self, id: &str) -> bool {
        let mut notifications = self.notifications.write();
        let before = notifications.len();
        notifications.retain(|stored| stored.id != id);
        notifications.len() != before
    }

    fn clear(&self) {
        self.notifications.write().clear();
    }

    fn count(&self) -> usize {
        self.notifications.read().len()
    }

    fn flush(&self) -> Vec<StoredNotification> {
        let mut notifications = self.notifications.write();
        let mut flushed = std::mem::take(&mut *notifications);
        flushed.reverse();
        flushed
    }
}

impl Storage for Arc<MemoryStorage> {
    fn push(&self, email_address: &str, request: NotifyRequest) -> String {
        (**self).push(email_address, request)
    }

    fn pop(&self) -> Option<StoredNotification> {
        (**self).pop()
    }

    fn get(&self, id: &str) -> Option<StoredNotification> {
        (**self).get(id)
    }

    fn all(&self) -> Vec<StoredNotification> {
        (**self).all()
    }

    fn delete(&self, id: &str) -> bool {
        (**self).delete(id)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn flush(&self) -> Vec<StoredNotification> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Personalisation;

    fn request(template_id: &str) -> NotifyRequest {
        NotifyRequest {
            template_id: template_id.to_string(),
            personalisation: Personalisation::new(),
            email_reply_to_id: None,
        }
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();

        let id = storage.push("one@example.com", request("first"));
        assert_eq!(storage.count(), 1);

        let stored = storage.get(&id).unwrap();
        assert_eq!(stored.email_address, "one@example.com");
        assert_eq!(stored.request.template_id, "first");

        let id2 = storage.push("two@example.com", request("second"));
        let all = storage.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, id2); // Newest first

        assert!(storage.delete(&id));
        assert!(!storage.delete(&id));
        assert_eq!(storage.count(), 1);
        assert!(storage.get(&id).is_none());

        storage.clear();
        assert_eq!(storage.count(), 0);
    }

    #[test]
    fn test_pop_and_flush() {
        let storage = MemoryStorage::new();
        storage.push("a@example.com", request("first"));
        storage.push("b@example.com", request("second"));
        storage.push("c@example.com", request("third"));

        assert_eq!(storage.pop().unwrap().request.template_id, "third");

        let flushed = storage.flush();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].request.template_id, "second");
        assert_eq!(flushed[1].request.template_id, "first");

        assert_eq!(storage.count(), 0);
        assert!(storage.flush().is_empty());
    }
}
