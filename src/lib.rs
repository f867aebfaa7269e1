//! # Missive Notify
//!
//! Send conventional emails through GOV.UK Notify templates.
//!
//! Notify only delivers pre-defined templates. Plain emails (subject + body)
//! are routed through a service-side "plain" template that renders the
//! `((subject))` and `((body))` placeholders; messages that name a custom
//! template carry their own personalisation instead.
//!
//! ## Quick Start
//!
//! Set environment variables:
//! ```bash
//! GOVUK_NOTIFY_API_KEY=my_key-26785a09-...-3d844edf-...
//! GOVUK_NOTIFY_PLAIN_EMAIL_TEMPLATE_ID=9d3c7a37-6b1c-4f4e-9d0b-2f6d0a1c5e11
//! ```
//!
//! Send emails:
//! ```rust,ignore
//! use missive_notify::{Email, NotifyBackend, NotifyConfig};
//!
//! let backend = NotifyBackend::new(NotifyConfig::from_env()?);
//!
//! let email = Email::new()
//!     .to("user@example.com")
//!     .subject("Welcome!")
//!     .text_body("Hello");
//!
//! backend.send_messages([email]).await?;
//! ```
//!
//! ## Custom Templates
//!
//! ```rust,ignore
//! use missive_notify::NotifyMessage;
//! use serde_json::json;
//!
//! let message = NotifyMessage::builder()
//!     .to("user@example.com")
//!     .template_id("43573f75-80e7-402f-b308-e5f1066fbd6f")
//!     .personalise("name", json!("Ada"))
//!     .email_reply_to_id("b2d1d3a8-63d5-4e6c-9e47-16a1a7ac7c08")
//!     .build()?;
//!
//! message.send(&backend).await?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `GOVUK_NOTIFY_API_KEY` | Notify API key |
//! | `GOVUK_NOTIFY_PLAIN_EMAIL_TEMPLATE_ID` | Template for plain subject/body emails |
//! | `GOVUK_NOTIFY_BASE_URL` | API base URL override (optional) |
//!
//! ## Feature Flags
//!
//! - `http` (default) - Notify REST client via reqwest
//! - `local` - test assertions over [`providers::LocalClient`]
//! - `metrics` - Prometheus-style metrics (counters/histograms)
//!
//! ## Metrics
//!
//! Enable `features = ["metrics"]` to emit:
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `missive_notify_notifications_total` | Counter | provider, status | Provider calls, one per recipient |
//! | `missive_notify_batch_total` | Counter | provider, status | Batches sent |
//! | `missive_notify_batch_size` | Histogram | provider | Messages per batch |
//!
//! Install a recorder (e.g., `metrics-exporter-prometheus`) in your app to collect them.

/// The version of the missive-notify crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod attachment;
mod backend;
mod client;
mod config;
mod convert;
mod email;
mod error;
mod message;
mod storage;

pub mod providers;

#[cfg(feature = "local")]
pub mod testing;

// Re-exports
pub use address::{Address, ToAddress};
pub use attachment::Attachment;
pub use backend::{ClientFactory, NotifyBackend};
pub use client::{DeliveryResult, NotifyClient};
pub use config::{NotifyConfig, API_KEY_VAR, BASE_URL_VAR, PLAIN_TEMPLATE_VAR};
pub use convert::{into_notify_message, Outbound};
pub use email::Email;
pub use error::NotifyError;
pub use message::{NotifyMessage, NotifyMessageBuilder, NotifyRequest, Personalisation};
pub use storage::{MemoryStorage, Storage, StoredNotification};

/// Send a single plain email through `backend`.
///
/// Builds an [`Email`] from the arguments and hands it to
/// [`NotifyBackend::send_messages`]. The sender is dropped by the converter,
/// since Notify fixes it per service, so any address may be passed.
///
/// Returns the number of messages sent (0 or 1).
///
/// ```rust,ignore
/// use missive_notify::send_mail;
///
/// send_mail(&backend, "Subject", "Body", "noreply@example.com", ["user@example.com"]).await?;
/// ```
pub async fn send_mail<F, I, A>(
    backend: &NotifyBackend,
    subject: impl Into<String>,
    body: impl Into<String>,
    from: F,
    recipient_list: I,
) -> Result<usize, NotifyError>
where
    F: ToAddress,
    I: IntoIterator<Item = A>,
    A: ToAddress,
{
    let email = Email::new()
        .from(from)
        .put_to(
            recipient_list
                .into_iter()
                .map(|addr| addr.to_address())
                .collect(),
        )
        .subject(subject)
        .text_body(body);

    backend.send_messages([email]).await
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Address;
    pub use crate::DeliveryResult;
    pub use crate::Email;
    pub use crate::NotifyBackend;
    pub use crate::NotifyClient;
    pub use crate::NotifyConfig;
    pub use crate::NotifyError;
    pub use crate::NotifyMessage;
    pub use crate::ToAddress;
    pub use crate::{into_notify_message, send_mail};

    pub use crate::Storage;
}
