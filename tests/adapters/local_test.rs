//! Local client tests.

use missive_notify::providers::LocalClient;
use missive_notify::{
    MemoryStorage, NotifyClient, NotifyError, NotifyRequest, Personalisation, Storage,
};
use serde_json::json;

const TEMPLATE_ID: &str = "43573f75-80e7-402f-b308-e5f1066fbd6f";

fn request(name: &str) -> NotifyRequest {
    let mut personalisation = Personalisation::new();
    personalisation.insert("name".into(), json!(name));
    NotifyRequest {
        template_id: TEMPLATE_ID.into(),
        personalisation,
        email_reply_to_id: None,
    }
}

// ============================================================================
// Basic Delivery Tests
// ============================================================================

#[tokio::test]
async fn send_returns_ok() {
    let client = LocalClient::new();

    let result = client
        .send_email_notification("steve.rogers@example.com", &request("Steve"))
        .await;
    assert!(result.is_ok());
    assert!(!result.unwrap().notification_id.is_empty());
}

#[tokio::test]
async fn notification_ids_are_unique() {
    let client = LocalClient::new();

    let first = client
        .send_email_notification("steve.rogers@example.com", &request("Steve"))
        .await
        .unwrap();
    let second = client
        .send_email_notification("natasha.romanoff@example.com", &request("Natasha"))
        .await
        .unwrap();

    assert_ne!(first.notification_id, second.notification_id);
}

// ============================================================================
// Storage Tests
// ============================================================================

#[tokio::test]
async fn captures_sent_notifications() {
    let client = LocalClient::new();
    client
        .send_email_notification("steve.rogers@example.com", &request("Steve"))
        .await
        .unwrap();

    assert!(client.has_notifications());
    assert_eq!(client.notification_count(), 1);
    assert!(client.sent_to("steve.rogers@example.com"));
    assert!(client.sent_with_template(TEMPLATE_ID));

    let last = client.last_notification().unwrap();
    assert_eq!(last.request.personalisation["name"], json!("Steve"));
}

#[tokio::test]
async fn can_flush_notifications() {
    let client = LocalClient::new();
    client
        .send_email_notification("a@example.com", &request("One"))
        .await
        .unwrap();
    client
        .send_email_notification("b@example.com", &request("Two"))
        .await
        .unwrap();

    let flushed = client.flush();
    assert_eq!(flushed.len(), 2);
    assert_eq!(client.notification_count(), 0);
}

#[tokio::test]
async fn can_clear_notifications() {
    let client = LocalClient::new();
    client
        .send_email_notification("a@example.com", &request("One"))
        .await
        .unwrap();

    client.clear();
    assert!(!client.has_notifications());
}

#[tokio::test]
async fn shares_external_storage() {
    let storage = MemoryStorage::shared();
    let client = LocalClient::with_storage(storage.clone());

    client
        .send_email_notification("a@example.com", &request("One"))
        .await
        .unwrap();

    assert_eq!(storage.count(), 1);
    assert_eq!(storage.all()[0].email_address, "a@example.com");
}

#[tokio::test]
async fn find_notifications_by_predicate() {
    let client = LocalClient::new();
    for name in ["Steve", "Natasha", "Tony"] {
        client
            .send_email_notification("team@example.com", &request(name))
            .await
            .unwrap();
    }

    let found = client.find_notifications(|n| n.request.personalisation["name"] == json!("Natasha"));
    assert_eq!(found.len(), 1);
}

// ============================================================================
// Failure Simulation Tests
// ============================================================================

#[tokio::test]
async fn set_failure_makes_every_call_fail() {
    let client = LocalClient::new();
    client.set_failure("Notify is down");

    let err = client
        .send_email_notification("a@example.com", &request("One"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::SendError(_)));
    assert!(err.to_string().contains("Notify is down"));
    assert!(!client.has_notifications());
}

#[tokio::test]
async fn fail_for_only_affects_one_address() {
    let client = LocalClient::new();
    client.fail_for("b@example.com", "Rejected");

    assert!(client
        .send_email_notification("a@example.com", &request("One"))
        .await
        .is_ok());
    assert!(client
        .send_email_notification("B@Example.com", &request("Two"))
        .await
        .is_err());

    client.clear_failure();
    assert!(client
        .send_email_notification("b@example.com", &request("Two"))
        .await
        .is_ok());
    assert_eq!(client.notification_count(), 2);
}
