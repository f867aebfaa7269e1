//! Notify API client tests.
//!
//! Runs the HTTP client against a mock Notify server.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use missive_notify::providers::NotifyApiClient;
use missive_notify::{
    NotifyBackend, NotifyClient, NotifyConfig, NotifyError, NotifyMessage, NotifyRequest,
    Personalisation,
};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICE_ID: &str = "26785a09-ab16-4eb0-8407-a37497a57506";
const SECRET_KEY: &str = "3d844edf-8d35-48ac-975b-e847b4f122b0";
const TEMPLATE_ID: &str = "43573f75-80e7-402f-b308-e5f1066fbd6f";
const PLAIN_TEMPLATE_ID: &str = "9d3c7a37-6b1c-4f4e-9d0b-2f6d0a1c5e11";
const NOTIFICATION_ID: &str = "740e5834-3a29-46b4-9a6f-16142fde533a";

// ============================================================================
// Helper Functions
// ============================================================================

fn api_key() -> String {
    format!("my_test_key-{}-{}", SERVICE_ID, SECRET_KEY)
}

fn client(server: &MockServer) -> NotifyApiClient {
    NotifyApiClient::new(api_key()).unwrap().base_url(server.uri())
}

fn request() -> NotifyRequest {
    let mut personalisation = Personalisation::new();
    personalisation.insert("name".into(), json!("Tony"));
    NotifyRequest {
        template_id: TEMPLATE_ID.into(),
        personalisation,
        email_reply_to_id: None,
    }
}

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "id": NOTIFICATION_ID,
        "reference": null,
        "content": {
            "subject": "Hello, Avengers!",
            "body": "Hello Tony",
            "from_email": "service@notifications.service.gov.uk"
        },
        "uri": format!("https://api.notifications.service.gov.uk/v2/notifications/{}", NOTIFICATION_ID),
        "template": {
            "id": TEMPLATE_ID,
            "version": 1,
            "uri": format!("https://api.notifications.service.gov.uk/services/{}/templates/{}", SERVICE_ID, TEMPLATE_ID)
        }
    }))
}

#[derive(Debug, Deserialize)]
struct Claims {
    iss: String,
    iat: i64,
}

// ============================================================================
// Basic Delivery Tests
// ============================================================================

#[tokio::test]
async fn successful_delivery_returns_ok() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .and(header("Content-Type", "application/json"))
        .and(header_exists("Authorization"))
        .and(body_json(json!({
            "email_address": "tony.stark@example.com",
            "template_id": TEMPLATE_ID,
            "personalisation": {"name": "Tony"}
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .send_email_notification("tony.stark@example.com", &request())
        .await;

    let delivery = result.unwrap();
    assert_eq!(delivery.notification_id, NOTIFICATION_ID);
    let response = delivery.provider_response.unwrap();
    assert_eq!(response["provider"], "notify");
    assert_eq!(response["template"]["id"], TEMPLATE_ID);
}

#[tokio::test]
async fn email_reply_to_id_is_sent_when_set() {
    let server = MockServer::start().await;
    let reply_to_id = "b2d1d3a8-63d5-4e6c-9e47-16a1a7ac7c08";

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .and(body_json(json!({
            "email_address": "tony.stark@example.com",
            "template_id": TEMPLATE_ID,
            "personalisation": {"name": "Tony"},
            "email_reply_to_id": reply_to_id
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let mut request = request();
    request.email_reply_to_id = Some(reply_to_id.into());

    let result = client(&server)
        .send_email_notification("tony.stark@example.com", &request)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn bearer_token_carries_service_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .respond_with(success_response())
        .mount(&server)
        .await;

    client(&server)
        .send_email_notification("tony.stark@example.com", &request())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    let token = authorization.strip_prefix("Bearer ").unwrap();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET_KEY.as_bytes()),
        &validation,
    )
    .unwrap()
    .claims;

    assert_eq!(claims.iss, SERVICE_ID);
    assert!(claims.iat > 0);
}

// ============================================================================
// Error Tests
// ============================================================================

#[tokio::test]
async fn deliver_with_400_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status_code": 400,
            "errors": [{
                "error": "BadRequestError",
                "message": "Can't send to this recipient using a team-only API key"
            }]
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .send_email_notification("tony.stark@example.com", &request())
        .await;

    match result {
        Err(NotifyError::ProviderError {
            provider,
            message,
            status,
        }) => {
            assert_eq!(provider, "notify");
            assert_eq!(status, Some(400));
            assert!(message.contains("team-only API key"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn deliver_with_500_response_without_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client(&server)
        .send_email_notification("tony.stark@example.com", &request())
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err,
        NotifyError::ProviderError {
            status: Some(500),
            ..
        }
    ));
}

#[test]
fn malformed_api_key_is_rejected() {
    assert!(matches!(
        NotifyApiClient::new("not a real key"),
        Err(NotifyError::Configuration(_))
    ));
}

#[test]
fn service_id_is_parsed_from_key() {
    let client = NotifyApiClient::new(api_key()).unwrap();
    assert_eq!(client.service_id(), SERVICE_ID);
    assert_eq!(client.provider_name(), "notify");
}

// ============================================================================
// Backend Integration Tests
// ============================================================================

#[tokio::test]
async fn backend_fans_out_to_notify() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .and(body_json(json!({
            "email_address": "tony.stark@example.com",
            "template_id": PLAIN_TEMPLATE_ID,
            "personalisation": {"subject": "Hello, Avengers!", "body": "Assemble"}
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .and(body_json(json!({
            "email_address": "steve.rogers@example.com",
            "template_id": PLAIN_TEMPLATE_ID,
            "personalisation": {"subject": "Hello, Avengers!", "body": "Assemble"}
        })))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let config = NotifyConfig::new(api_key(), PLAIN_TEMPLATE_ID).base_url(server.uri());
    let backend = NotifyBackend::new(config);

    let message = NotifyMessage::builder()
        .to("tony.stark@example.com")
        .to("steve.rogers@example.com")
        .subject("Hello, Avengers!")
        .body("Assemble")
        .build()
        .unwrap();

    assert_eq!(backend.send_messages([message]).await.unwrap(), 1);
}

#[tokio::test]
async fn backend_fail_silently_swallows_provider_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/notifications/email"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "status_code": 403,
            "errors": [{"error": "AuthError", "message": "Invalid token: API key not found"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = NotifyConfig::new(api_key(), PLAIN_TEMPLATE_ID).base_url(server.uri());
    let backend = NotifyBackend::new(config).fail_silently(true);

    let message = NotifyMessage::builder()
        .to("tony.stark@example.com")
        .to("steve.rogers@example.com")
        .subject("Hello, Avengers!")
        .body("Assemble")
        .build()
        .unwrap();

    assert_eq!(backend.send_messages([message]).await.unwrap(), 0);
}
