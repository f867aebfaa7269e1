//! The Notify email backend.
//!
//! [`NotifyBackend`] converts a batch of messages, then makes one provider
//! call per recipient per message. The returned count is of *messages*: a
//! message with two recipients counts once, even though it costs two calls.
//!
//! # Locking
//!
//! The provider client is created lazily and kept behind a single async
//! mutex. The guard is held for client initialization *and* the whole send
//! loop, so concurrent batches on one backend run one after another.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::Instrument;

use crate::address::Address;
use crate::client::NotifyClient;
use crate::config::NotifyConfig;
use crate::convert::{into_notify_message, Outbound};
use crate::error::NotifyError;
use crate::message::NotifyMessage;

/// Creates the provider client on first use.
pub type ClientFactory =
    Arc<dyn Fn(&NotifyConfig) -> Result<Arc<dyn NotifyClient>, NotifyError> + Send + Sync>;

/// An email backend that delivers through GOV.UK Notify.
///
/// # Example
///
/// ```rust,ignore
/// use missive_notify::{Email, NotifyBackend, NotifyConfig};
///
/// let backend = NotifyBackend::new(NotifyConfig::from_env()?);
///
/// let email = Email::new()
///     .to("user@example.com")
///     .subject("Welcome!")
///     .text_body("Hello");
///
/// let sent = backend.send_messages([email]).await?;
/// ```
pub struct NotifyBackend {
    config: NotifyConfig,
    fail_silently: bool,
    factory: ClientFactory,
    client: Mutex<Option<Arc<dyn NotifyClient>>>,
}

impl NotifyBackend {
    /// Create a backend that talks to the Notify API.
    ///
    /// The API client is built from `config` on first use.
    pub fn new(config: NotifyConfig) -> Self {
        Self::with_factory(config, default_factory())
    }

    /// Create a backend around an existing client.
    pub fn with_client<C: NotifyClient + 'static>(config: NotifyConfig, client: C) -> Self {
        let client: Arc<dyn NotifyClient> = Arc::new(client);
        Self::with_factory(
            config,
            Arc::new(
                move |_: &NotifyConfig| -> Result<Arc<dyn NotifyClient>, NotifyError> {
                    Ok(Arc::clone(&client))
                },
            ),
        )
    }

    /// Create a backend with a custom client constructor.
    pub fn with_client_factory<F>(config: NotifyConfig, factory: F) -> Self
    where
        F: Fn(&NotifyConfig) -> Result<Arc<dyn NotifyClient>, NotifyError> + Send + Sync + 'static,
    {
        Self::with_factory(config, Arc::new(factory))
    }

    fn with_factory(config: NotifyConfig, factory: ClientFactory) -> Self {
        Self {
            config,
            fail_silently: false,
            factory,
            client: Mutex::new(None),
        }
    }

    /// Swallow conversion errors and any error returned by the client,
    /// counting the message as unsent.
    pub fn fail_silently(mut self, fail_silently: bool) -> Self {
        self.fail_silently = fail_silently;
        self
    }

    pub fn is_fail_silently(&self) -> bool {
        self.fail_silently
    }

    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    /// Initialize the provider client now instead of on the first batch.
    pub async fn open(&self) -> Result<(), NotifyError> {
        let mut guard = self.client.lock().await;
        self.open_locked(&mut guard)?;
        Ok(())
    }

    /// Drop the provider client; the next batch creates a fresh one.
    pub async fn close(&self) {
        self.client.lock().await.take();
    }

    fn open_locked(
        &self,
        slot: &mut Option<Arc<dyn NotifyClient>>,
    ) -> Result<Arc<dyn NotifyClient>, NotifyError> {
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = (self.factory)(&self.config)?;
        tracing::debug!(provider = client.provider_name(), "Notify client initialized");
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Send a batch of messages and return how many were sent.
    ///
    /// Accepts [`NotifyMessage`]s and generic [`Email`](crate::Email)s.
    /// Messages without recipients are skipped.
    ///
    /// # Errors
    ///
    /// Unsupported fields, inconsistent templates, unparseable recipients and
    /// client construction errors always fail the batch. Conversion errors and
    /// errors returned by the client fail it unless the backend was built with
    /// `fail_silently(true)`.
    pub async fn send_messages<I, M>(&self, messages: I) -> Result<usize, NotifyError>
    where
        I: IntoIterator<Item = M>,
        M: Into<Outbound>,
    {
        let mut converted = Vec::new();
        for message in messages {
            if let Some(message) = into_notify_message(message, self.fail_silently)? {
                converted.push(message);
            }
        }

        if converted.is_empty() {
            return Ok(0);
        }

        let mut guard = self.client.lock().await;
        let client = self.open_locked(&mut guard)?;
        let provider = client.provider_name();
        let count = converted.len();

        let span = tracing::info_span!("notify.send_messages", provider = provider, count = count);

        let result = async {
            let mut num_sent = 0;
            for message in &converted {
                if self.send_one(client.as_ref(), message).await? {
                    num_sent += 1;
                }
            }
            Ok::<usize, NotifyError>(num_sent)
        }
        .instrument(span)
        .await;

        #[cfg(feature = "metrics")]
        {
            let status = if result.is_ok() { "success" } else { "error" };
            metrics::counter!("missive_notify_batch_total", "provider" => provider, "status" => status)
                .increment(1);
            metrics::histogram!("missive_notify_batch_size", "provider" => provider)
                .record(count as f64);
        }

        result
    }

    /// Send one message to each of its recipients, stopping at the first
    /// failed call. Returns whether the message counts as sent.
    async fn send_one(
        &self,
        client: &dyn NotifyClient,
        message: &NotifyMessage,
    ) -> Result<bool, NotifyError> {
        if message.recipients().is_empty() {
            tracing::debug!("Skipping message without recipients");
            return Ok(false);
        }

        let request = message.to_request(&self.config.plain_template_id)?;
        let recipients = message
            .recipients()
            .iter()
            .map(Address::to_ascii)
            .collect::<Result<Vec<_>, _>>()?;

        for recipient in &recipients {
            tracing::debug!(
                email_address = %recipient,
                template_id = %request.template_id,
                "Sending email notification"
            );

            let result = client.send_email_notification(recipient, &request).await;

            #[cfg(feature = "metrics")]
            {
                let status = if result.is_ok() { "success" } else { "error" };
                metrics::counter!(
                    "missive_notify_notifications_total",
                    "provider" => client.provider_name(),
                    "status" => status
                )
                .increment(1);
            }

            match result {
                Ok(delivery) => {
                    tracing::info!(notification_id = %delivery.notification_id, "Notification sent");
                }
                Err(e) if self.fail_silently => {
                    tracing::warn!(error = %e, "Notification failed; message counted as unsent");
                    return Ok(false);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Notification failed");
                    return Err(e);
                }
            }
        }

        Ok(true)
    }
}

fn default_factory() -> ClientFactory {
    Arc::new(|config: &NotifyConfig| -> Result<Arc<dyn NotifyClient>, NotifyError> {
        #[cfg(feature = "http")]
        {
            let mut client = crate::providers::NotifyApiClient::new(&config.api_key)?;
            if let Some(ref url) = config.base_url {
                client = client.base_url(url);
            }
            Ok(Arc::new(client) as Arc<dyn NotifyClient>)
        }
        #[cfg(not(feature = "http"))]
        {
            let _ = config;
            Err(NotifyError::Configuration(
                "NotifyBackend::new needs the 'http' feature. \
                Add `features = [\"http\"]` to Cargo.toml or use NotifyBackend::with_client"
                    .into(),
            ))
        }
    })
}
