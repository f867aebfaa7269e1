//! Notify-shaped messages and the request records they serialize to.
//!
//! A [`NotifyMessage`] is either a *plain* message (subject + body, sent
//! through the configured default plain-text template) or a *template*
//! message (template id + personalisation). Fields Notify cannot carry are
//! refused when the message is built; the subject/body/template combination is
//! checked when the message is turned into a [`NotifyRequest`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::address::{Address, ToAddress};
use crate::attachment::Attachment;
use crate::backend::NotifyBackend;
use crate::error::NotifyError;

/// Values substituted into a template's placeholders.
pub type Personalisation = HashMap<String, Value>;

/// The provider request record for one message.
///
/// Sent once per recipient, together with that recipient's address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyRequest {
    /// Template to render.
    pub template_id: String,
    /// Placeholder values.
    pub personalisation: Personalisation,
    /// Reply-to address configured on the Notify service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_reply_to_id: Option<String>,
}

/// An email message that knows how to work with Notify templates.
///
/// Build one with [`NotifyMessage::builder`]:
///
/// ```
/// use missive_notify::NotifyMessage;
/// use serde_json::json;
///
/// // Plain message, sent through the default template
/// let plain = NotifyMessage::builder()
///     .to("user@example.com")
///     .subject("Hello")
///     .body("Message content")
///     .build()
///     .unwrap();
///
/// // Custom template
/// let templated = NotifyMessage::builder()
///     .to("user@example.com")
///     .template_id("43573f75-80e7-402f-b308-e5f1066fbd6f")
///     .personalise("name", json!("Ada"))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifyMessage {
    subject: String,
    body: String,
    to: Vec<Address>,
    template_id: Option<String>,
    personalisation: Personalisation,
    email_reply_to_id: Option<String>,
}

impl NotifyMessage {
    /// Start building a message.
    pub fn builder() -> NotifyMessageBuilder {
        NotifyMessageBuilder::default()
    }

    /// Subject line (empty when unset).
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Body text (empty when unset).
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Recipients, in the order they will be sent to.
    pub fn recipients(&self) -> &[Address] {
        &self.to
    }

    /// Custom template id, if any.
    pub fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    /// Template placeholder values.
    pub fn personalisation(&self) -> &Personalisation {
        &self.personalisation
    }

    /// Reply-to address id, if one was set.
    pub fn email_reply_to_id(&self) -> Option<&str> {
        self.email_reply_to_id.as_deref()
    }

    /// Replace all recipients.
    pub fn put_to(&mut self, addrs: Vec<Address>) {
        self.to = addrs;
    }

    /// Check the subject/body/template/personalisation combination.
    pub fn validate(&self) -> Result<(), NotifyError> {
        match self.template_id {
            None => {
                if self.subject.is_empty() || self.body.is_empty() {
                    return Err(NotifyError::Validation(
                        "If using the default template, subject and body are needed.".into(),
                    ));
                }
                if !self.personalisation.is_empty() {
                    return Err(NotifyError::Validation(
                        "If using the default template, do not supply personalisation.".into(),
                    ));
                }
            }
            Some(_) => {
                if !self.subject.is_empty() || !self.body.is_empty() {
                    return Err(NotifyError::Validation(
                        "Do not set subject or body with a custom template ID.".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Serialize into the provider request record.
    ///
    /// Without a custom template the message goes through
    /// `default_template_id` with `{subject, body}` as personalisation.
    pub fn to_request(&self, default_template_id: &str) -> Result<NotifyRequest, NotifyError> {
        self.validate()?;

        let (template_id, personalisation) = match &self.template_id {
            None => {
                let mut personalisation = Personalisation::new();
                personalisation.insert("subject".into(), Value::String(self.subject.clone()));
                personalisation.insert("body".into(), Value::String(self.body.clone()));
                (default_template_id.to_string(), personalisation)
            }
            Some(template_id) => (template_id.clone(), self.personalisation.clone()),
        };

        Ok(NotifyRequest {
            template_id,
            personalisation,
            email_reply_to_id: self.email_reply_to_id.clone(),
        })
    }

    /// Send this message through `backend`.
    ///
    /// Returns 1 if it was delivered to its recipients, 0 otherwise.
    pub async fn send(&self, backend: &NotifyBackend) -> Result<usize, NotifyError> {
        backend.send_messages([self.clone()]).await
    }
}

/// Builder for [`NotifyMessage`].
///
/// Accepts every field a conventional email has, so callers and the
/// converter can hand over whatever they hold; [`build`](Self::build) refuses
/// the ones Notify cannot deliver.
#[derive(Debug, Default)]
pub struct NotifyMessageBuilder {
    subject: String,
    body: String,
    to: Vec<Address>,
    from: Option<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    attachments: Vec<Attachment>,
    headers: HashMap<String, String>,
    template_id: Option<Value>,
    personalisation: Personalisation,
    email_reply_to_id: Option<Value>,
}

impl NotifyMessageBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a recipient.
    pub fn to(mut self, addr: impl ToAddress) -> Self {
        self.to.push(addr.to_address());
        self
    }

    /// Replace all recipients.
    pub fn put_to(mut self, addrs: Vec<Address>) -> Self {
        self.to = addrs;
        self
    }

    /// Not supported: the sender is fixed by the Notify service.
    pub fn from(mut self, addr: impl ToAddress) -> Self {
        self.from = Some(addr.to_address());
        self
    }

    /// Not supported.
    pub fn cc(mut self, addr: impl ToAddress) -> Self {
        self.cc.push(addr.to_address());
        self
    }

    /// Not supported.
    pub fn put_cc(mut self, addrs: Vec<Address>) -> Self {
        self.cc = addrs;
        self
    }

    /// Not supported.
    pub fn bcc(mut self, addr: impl ToAddress) -> Self {
        self.bcc.push(addr.to_address());
        self
    }

    /// Not supported.
    pub fn put_bcc(mut self, addrs: Vec<Address>) -> Self {
        self.bcc = addrs;
        self
    }

    /// Not supported.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Not supported.
    pub fn put_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Not supported.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Use a custom template. Must be a UUID string; `null` means unset.
    pub fn template_id(mut self, id: impl Into<Value>) -> Self {
        self.template_id = Some(id.into());
        self
    }

    /// Replace the personalisation map.
    pub fn personalisation(mut self, personalisation: Personalisation) -> Self {
        self.personalisation = personalisation;
        self
    }

    /// Set one personalisation value.
    pub fn personalise(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.personalisation.insert(key.into(), value.into());
        self
    }

    /// Reply-to address id from the Notify service settings. Must be a UUID
    /// string; `null` means unset.
    pub fn email_reply_to_id(mut self, id: impl Into<Value>) -> Self {
        self.email_reply_to_id = Some(id.into());
        self
    }

    /// Build the message, refusing fields Notify cannot deliver.
    pub fn build(self) -> Result<NotifyMessage, NotifyError> {
        if self.from.is_some() {
            return Err(NotifyError::Unsupported(
                "Custom from address is not supported; use email_reply_to_id.".into(),
            ));
        }
        if !self.attachments.is_empty() {
            return Err(NotifyError::Unsupported(
                "Attachments are not supported.".into(),
            ));
        }
        if !self.headers.is_empty() {
            return Err(NotifyError::Unsupported(
                "Custom headers are not supported.".into(),
            ));
        }
        if !self.cc.is_empty() {
            return Err(NotifyError::Unsupported(
                "CC recipients are not supported.".into(),
            ));
        }
        if !self.bcc.is_empty() {
            return Err(NotifyError::Unsupported(
                "BCC recipients are not supported.".into(),
            ));
        }

        let template_id = parse_identifier("template_id", self.template_id)?;
        let email_reply_to_id = parse_identifier("email_reply_to_id", self.email_reply_to_id)?;

        Ok(NotifyMessage {
            subject: self.subject,
            body: self.body,
            to: self.to,
            template_id,
            personalisation: self.personalisation,
            email_reply_to_id,
        })
    }
}

/// Accept a UUID string as-is; anything that is not a string is a type error.
fn parse_identifier(
    field: &'static str,
    value: Option<Value>,
) -> Result<Option<String>, NotifyError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => match Uuid::parse_str(&s) {
            Ok(_) => Ok(Some(s)),
            Err(_) => Err(NotifyError::InvalidIdentifier { field, value: s }),
        },
        Some(_) => Err(NotifyError::InvalidType { field }),
    }
}
