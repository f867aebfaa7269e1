//! Testing utilities and assertion helpers.
//!
//! Assertions over the notifications recorded by a [`LocalClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use missive_notify::providers::LocalClient;
//! use missive_notify::testing::*;
//!
//! #[tokio::test]
//! async fn test_welcome_flow() {
//!     let client = LocalClient::new();
//!     let backend = NotifyBackend::with_client(config(), client.clone());
//!
//!     // ... trigger sending ...
//!
//!     assert_notification_sent(&client);
//!     assert_notification_to(&client, "user@example.com");
//!     assert_template_used(&client, PLAIN_TEMPLATE_ID);
//!     assert_personalisation(&client, "subject", "Welcome!");
//!     refute_notification_to(&client, "admin@example.com");
//!
//!     // Regex matching
//!     assert_personalisation_matches(&client, "body", r"Hello \w+");
//! }
//! ```

use regex::Regex;
use serde_json::Value;

use crate::providers::LocalClient;
use crate::storage::StoredNotification;

// ============================================================================
// Helper Functions
// ============================================================================

/// Format a list of notifications for error messages.
fn format_notification_summary(notifications: &[StoredNotification]) -> String {
    if notifications.is_empty() {
        return "  (no notifications sent)".to_string();
    }

    notifications
        .iter()
        .enumerate()
        .map(|(i, stored)| {
            let mut keys: Vec<&str> = stored
                .request
                .personalisation
                .keys()
                .map(String::as_str)
                .collect();
            keys.sort_unstable();
            format!(
                "  {}. To: {}, Template: {}, Personalisation: [{}]",
                i + 1,
                stored.email_address,
                stored.request.template_id,
                keys.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Personalisation values as text: strings unquoted, everything else as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn last_or_panic(client: &LocalClient) -> StoredNotification {
    client
        .last_notification()
        .expect("Expected at least one notification to be sent, but none were sent")
}

// ============================================================================
// Basic Assertions
// ============================================================================

/// Assert that at least one notification was sent.
///
/// # Panics
///
/// Panics if no notifications were sent.
pub fn assert_notification_sent(client: &LocalClient) {
    assert!(
        client.has_notifications(),
        "Expected at least one notification to be sent, but none were sent"
    );
}

/// Assert that no notifications were sent.
///
/// # Panics
///
/// Panics if any notification was sent.
pub fn assert_no_notifications_sent(client: &LocalClient) {
    let notifications = client.notifications();
    assert!(
        notifications.is_empty(),
        "Expected no notifications to be sent, but {} were sent.\n\nNotifications sent:\n{}",
        notifications.len(),
        format_notification_summary(&notifications)
    );
}

/// Assert that exactly N provider calls were recorded.
///
/// A message with two recipients records two notifications.
///
/// # Panics
///
/// Panics if the count doesn't match.
pub fn assert_notification_count(client: &LocalClient, expected: usize) {
    let actual = client.notification_count();
    assert!(
        actual == expected,
        "Expected {} notification(s) to be sent, but {} were sent.\n\nNotifications sent:\n{}",
        expected,
        actual,
        format_notification_summary(&client.notifications())
    );
}

/// Assert that a notification was sent to a specific address.
///
/// # Panics
///
/// Panics if no notification was sent to the address.
pub fn assert_notification_to(client: &LocalClient, email_address: &str) {
    assert!(
        client.sent_to(email_address),
        "Expected a notification to be sent to '{}'.\n\nNotifications sent:\n{}",
        email_address,
        format_notification_summary(&client.notifications())
    );
}

/// Assert that no notification was sent to a specific address.
///
/// # Panics
///
/// Panics if a notification was sent to the address.
pub fn assert_no_notifications_to(client: &LocalClient, email_address: &str) {
    let notifications = client.notifications();
    let found = notifications
        .iter()
        .find(|stored| stored.email_address.eq_ignore_ascii_case(email_address));

    if let Some(found) = found {
        panic!(
            "Expected no notification to be sent to '{}', but found one.\n\nMatching notification:\n  Template: {}\n\nAll notifications:\n{}",
            email_address,
            found.request.template_id,
            format_notification_summary(&notifications)
        );
    }
}

/// Assert that some notification used the given template.
///
/// # Panics
///
/// Panics if no notification used the template.
pub fn assert_template_used(client: &LocalClient, template_id: &str) {
    assert!(
        client.sent_with_template(template_id),
        "Expected a notification using template '{}'.\n\nNotifications sent:\n{}",
        template_id,
        format_notification_summary(&client.notifications())
    );
}

/// Assert the last notification's personalisation has `key` equal to `expected`.
///
/// String values compare unquoted; other values compare by their JSON text.
///
/// # Panics
///
/// Panics if no notification was sent, the key is missing, or the value differs.
pub fn assert_personalisation(client: &LocalClient, key: &str, expected: &str) {
    let last = last_or_panic(client);
    let actual = last.request.personalisation.get(key).map(value_text);

    assert!(
        actual.as_deref() == Some(expected),
        "Expected personalisation '{}' to be '{}', but was {:?}.\n\nLast notification:\n{}",
        key,
        expected,
        actual,
        format_notification_summary(&[last.clone()])
    );
}

/// Assert the last notification's `reply-to` id.
///
/// # Panics
///
/// Panics if no notification was sent or the id differs.
pub fn assert_email_reply_to_id(client: &LocalClient, expected: Option<&str>) {
    let last = last_or_panic(client);
    let actual = last.request.email_reply_to_id.as_deref();

    assert!(
        actual == expected,
        "Expected email_reply_to_id {:?}, but was {:?}.\n\nLast notification:\n{}",
        expected,
        actual,
        format_notification_summary(&[last.clone()])
    );
}

/// Assert that a notification matching a predicate was sent.
///
/// # Panics
///
/// Panics if no matching notification was found.
pub fn assert_notification_sent_with<F>(client: &LocalClient, predicate: F)
where
    F: Fn(&StoredNotification) -> bool,
{
    let matches = client.find_notifications(predicate);
    assert!(
        !matches.is_empty(),
        "Expected a notification matching the predicate, but none was found.\n\nNotifications sent:\n{}",
        format_notification_summary(&client.notifications())
    );
}

/// Get the last notification sent, or panic if none.
///
/// # Panics
///
/// Panics if no notifications were sent.
pub fn get_last_notification(client: &LocalClient) -> StoredNotification {
    last_or_panic(client)
}

/// Get all notifications sent to a specific address.
pub fn get_notifications_to(client: &LocalClient, email_address: &str) -> Vec<StoredNotification> {
    client.find_notifications(|stored| stored.email_address.eq_ignore_ascii_case(email_address))
}

/// Flush and return all notifications from the client.
pub fn flush_notifications(client: &LocalClient) -> Vec<StoredNotification> {
    client.flush()
}

// ============================================================================
// Regex Matching
// ============================================================================

/// Assert the last notification's personalisation value for `key` matches a
/// regex pattern.
///
/// # Panics
///
/// Panics if no notification was sent, the key is missing, or the value
/// doesn't match.
pub fn assert_personalisation_matches(client: &LocalClient, key: &str, pattern: &str) {
    let last = last_or_panic(client);
    let re = Regex::new(pattern).expect("Invalid regex pattern");
    let text = last
        .request
        .personalisation
        .get(key)
        .map(value_text)
        .unwrap_or_default();

    assert!(
        re.is_match(&text),
        "Expected personalisation '{}' to match pattern '{}', but was '{}'.\n\nLast notification:\n{}",
        key,
        pattern,
        &text[..text.len().min(500)],
        format_notification_summary(&[last.clone()])
    );
}

// ============================================================================
// Refute Assertions
// ============================================================================

/// Refute that any notification was sent (alias for assert_no_notifications_sent).
pub fn refute_notification_sent(client: &LocalClient) {
    assert_no_notifications_sent(client);
}

/// Refute that a notification was sent to a specific address (alias for
/// assert_no_notifications_to).
pub fn refute_notification_to(client: &LocalClient, email_address: &str) {
    assert_no_notifications_to(client, email_address);
}

/// Refute that a notification matching the predicate was sent.
///
/// # Panics
///
/// Panics if a matching notification was found.
pub fn refute_notification_sent_with<F>(client: &LocalClient, predicate: F)
where
    F: Fn(&StoredNotification) -> bool,
{
    let matches = client.find_notifications(predicate);
    if !matches.is_empty() {
        panic!(
            "Expected no notifications matching the predicate, but {} were found.\n\nMatching notifications:\n{}",
            matches.len(),
            format_notification_summary(&matches)
        );
    }
}
