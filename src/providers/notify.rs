//! GOV.UK Notify API client.
//!
//! # Example
//!
//! ```rust,ignore
//! use missive_notify::providers::NotifyApiClient;
//!
//! let client = NotifyApiClient::new(
//!     "my_key-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0",
//! )?;
//! ```
//!
//! ## Authentication
//!
//! A Notify API key is `{key_name}-{service_id}-{secret_key}`, the last two
//! parts being UUIDs. Every request carries a fresh HS256 JWT whose issuer is
//! the service id and whose `iat` is the current time, signed with the secret
//! key. Notify rejects tokens more than 30 seconds old, so they are never
//! cached.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::client::{DeliveryResult, NotifyClient};
use crate::error::NotifyError;
use crate::message::{NotifyRequest, Personalisation};

const NOTIFY_API_URL: &str = "https://api.notifications.service.gov.uk";

/// Length of `{service_id}-{secret_key}` at the end of an API key.
const KEY_SUFFIX_LEN: usize = 73;
const UUID_LEN: usize = 36;

/// GOV.UK Notify API client.
pub struct NotifyApiClient {
    service_id: String,
    secret_key: String,
    client: Client,
    base_url: String,
}

impl NotifyApiClient {
    /// Create a new client from a Notify API key.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self, NotifyError> {
        Self::with_client(api_key, Client::new())
    }

    /// Create with a custom reqwest client.
    pub fn with_client(api_key: impl AsRef<str>, client: Client) -> Result<Self, NotifyError> {
        let (service_id, secret_key) = parse_api_key(api_key.as_ref())?;
        Ok(Self {
            service_id,
            secret_key,
            client,
            base_url: NOTIFY_API_URL.to_string(),
        })
    }

    /// Set a custom base URL (for testing).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// The service id embedded in the API key.
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    fn bearer_token(&self) -> Result<String, NotifyError> {
        let claims = TokenClaims {
            iss: self.service_id.clone(),
            iat: Utc::now().timestamp(),
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )?)
    }

    fn build_request<'a>(
        email_address: &'a str,
        request: &'a NotifyRequest,
    ) -> EmailNotificationRequest<'a> {
        EmailNotificationRequest {
            email_address,
            template_id: &request.template_id,
            personalisation: &request.personalisation,
            email_reply_to_id: request.email_reply_to_id.as_deref(),
        }
    }

    fn parse_response(result: NotifyResponse) -> DeliveryResult {
        DeliveryResult::with_response(
            result.id,
            serde_json::json!({
                "provider": "notify",
                "reference": result.reference,
                "uri": result.uri,
                "template": result.template,
            }),
        )
    }

    fn parse_error(status: reqwest::StatusCode, error: NotifyErrorResponse) -> NotifyError {
        let message = if error.errors.is_empty() {
            "Unknown error".to_string()
        } else {
            error
                .errors
                .iter()
                .map(|e| format!("[{}] {}", e.error, e.message))
                .collect::<Vec<_>>()
                .join("; ")
        };
        NotifyError::provider_with_status("notify", message, status.as_u16())
    }
}

#[async_trait]
impl NotifyClient for NotifyApiClient {
    async fn send_email_notification(
        &self,
        email_address: &str,
        request: &NotifyRequest,
    ) -> Result<DeliveryResult, NotifyError> {
        let body = Self::build_request(email_address, request);
        let token = self.bearer_token()?;
        let url = format!("{}/v2/notifications/email", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .header("User-Agent", format!("missive-notify/{}", crate::VERSION))
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let result: NotifyResponse = response.json().await?;
            Ok(Self::parse_response(result))
        } else {
            let error: NotifyErrorResponse =
                response.json().await.unwrap_or(NotifyErrorResponse {
                    errors: Vec::new(),
                });
            Err(Self::parse_error(status, error))
        }
    }

    fn provider_name(&self) -> &'static str {
        "notify"
    }
}

/// Split an API key into `(service_id, secret_key)`.
fn parse_api_key(api_key: &str) -> Result<(String, String), NotifyError> {
    let key = api_key.trim();
    if !key.is_ascii() || key.len() < KEY_SUFFIX_LEN {
        return Err(NotifyError::Configuration(
            "Notify API key is malformed; expected {key_name}-{service_id}-{secret_key}".into(),
        ));
    }

    let suffix = &key[key.len() - KEY_SUFFIX_LEN..];
    let service_id = &suffix[..UUID_LEN];
    let secret_key = &suffix[UUID_LEN + 1..];

    if Uuid::parse_str(service_id).is_err() || Uuid::parse_str(secret_key).is_err() {
        return Err(NotifyError::Configuration(
            "Notify API key does not end with a service id and secret key".into(),
        ));
    }

    Ok((service_id.to_string(), secret_key.to_string()))
}

// ============================================================================
// Notify API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    iss: String,
    iat: i64,
}

#[derive(Debug, Serialize)]
struct EmailNotificationRequest<'a> {
    email_address: &'a str,
    template_id: &'a str,
    personalisation: &'a Personalisation,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_reply_to_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct NotifyResponse {
    id: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    template: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NotifyErrorResponse {
    #[serde(default)]
    errors: Vec<NotifyApiError>,
}

#[derive(Debug, Deserialize)]
struct NotifyApiError {
    error: String,
    message: String,
}
