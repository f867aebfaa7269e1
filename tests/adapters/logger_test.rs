//! Logger client tests.

use missive_notify::providers::LoggerClient;
use missive_notify::{NotifyBackend, NotifyClient, NotifyConfig, NotifyMessage, NotifyRequest};
use std::collections::HashMap;

fn request() -> NotifyRequest {
    NotifyRequest {
        template_id: "43573f75-80e7-402f-b308-e5f1066fbd6f".into(),
        personalisation: HashMap::new(),
        email_reply_to_id: None,
    }
}

#[tokio::test]
async fn send_returns_ok() {
    let client = LoggerClient::new();

    let result = client
        .send_email_notification("steve.rogers@example.com", &request())
        .await;
    assert!(result.is_ok());
    assert!(!result.unwrap().notification_id.is_empty());
}

#[tokio::test]
async fn send_with_full_logging_returns_ok() {
    let client = LoggerClient::full();

    let result = client
        .send_email_notification("steve.rogers@example.com", &request())
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn backend_with_logger_counts_messages() {
    let backend = NotifyBackend::with_client(
        NotifyConfig::new("not a real key", "9d3c7a37-6b1c-4f4e-9d0b-2f6d0a1c5e11"),
        LoggerClient::new(),
    );

    let message = NotifyMessage::builder()
        .to("steve.rogers@example.com")
        .to("tony.stark@example.com")
        .subject("Hello, Avengers!")
        .body("Hello!")
        .build()
        .unwrap();

    assert_eq!(backend.send_messages([message]).await.unwrap(), 1);
}

#[test]
fn provider_name_is_logger() {
    assert_eq!(LoggerClient::new().provider_name(), "logger");
}
