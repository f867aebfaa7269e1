//! Email address type with optional display name.

use crate::error::NotifyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An email address with an optional display name.
///
/// Notify only ever sees the bare address: the display name is kept so a
/// generic [`Email`](crate::Email) can be built the usual way, then dropped
/// when the recipient is sanitized for the API call.
///
/// # Examples
///
/// ```
/// use missive_notify::Address;
///
/// let addr: Address = "user@example.com".into();
/// assert_eq!(addr.email, "user@example.com");
/// assert_eq!(addr.name, None);
///
/// let addr: Address = ("Alice", "alice@example.com").into();
/// assert_eq!(addr.name, Some("Alice".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Optional display name (e.g., "Alice Smith")
    pub name: Option<String>,
    /// Email address (e.g., "alice@example.com")
    pub email: String,
}

impl Address {
    /// Create a new address with just an email.
    ///
    /// Logs a warning if the email looks invalid. Nothing is rejected until
    /// [`Address::to_ascii`] runs at send time.
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(
                email = %email,
                "Creating address with potentially invalid email"
            );
        }

        Self { name: None, email }
    }

    /// Create a new address with a name and email.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        let email = email.into();

        if !Self::basic_sanity_check(&email) {
            tracing::warn!(
                email = %email,
                "Creating address with potentially invalid email"
            );
        }

        Self {
            name: Some(name.into()),
            email,
        }
    }

    /// Non-empty and contains @. Not a full validation.
    fn basic_sanity_check(email: &str) -> bool {
        !email.is_empty() && email.contains('@')
    }

    /// Convert the domain part of the address to ASCII (Punycode).
    ///
    /// This is the form handed to Notify as `email_address`. The local part
    /// is preserved as-is and surrounding whitespace is trimmed.
    ///
    /// ```
    /// use missive_notify::Address;
    ///
    /// let addr = Address::new("user@例え.jp");
    /// assert_eq!(addr.to_ascii().unwrap(), "user@xn--r8jz45g.jp");
    /// ```
    pub fn to_ascii(&self) -> Result<String, NotifyError> {
        let email = self.email.trim();
        let (local_part, domain) = email.rsplit_once('@').ok_or_else(|| {
            NotifyError::InvalidAddress(format!("'{}' is missing @ symbol", self.email))
        })?;
        if local_part.is_empty() || domain.is_empty() {
            return Err(NotifyError::InvalidAddress(format!(
                "'{}' has an empty local part or domain",
                self.email
            )));
        }

        let ascii_domain = idna::domain_to_ascii(domain).map_err(|e| {
            NotifyError::InvalidAddress(format!(
                "Failed to convert domain '{}' to ASCII: {:?}",
                domain, e
            ))
        })?;

        Ok(format!("{}@{}", local_part, ascii_domain))
    }

    /// Format as "Name <email>" or just "email" if no name.
    pub fn formatted(&self) -> String {
        match &self.name {
            Some(name) if name.is_empty() => self.email.clone(),
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl From<(&str, &str)> for Address {
    fn from((name, email): (&str, &str)) -> Self {
        Self::with_name(name, email)
    }
}

impl From<(String, String)> for Address {
    fn from((name, email): (String, String)) -> Self {
        Self::with_name(name, email)
    }
}

/// Trait for types that can be converted to an email address.
///
/// Implement this for your own user types to pass them straight to the
/// builder methods of [`Email`](crate::Email) and
/// [`NotifyMessageBuilder`](crate::NotifyMessageBuilder).
///
/// ```rust
/// use missive_notify::{Address, ToAddress};
///
/// struct User {
///     email: String,
/// }
///
/// impl ToAddress for User {
///     fn to_address(&self) -> Address {
///         Address::new(&self.email)
///     }
/// }
/// ```
pub trait ToAddress {
    fn to_address(&self) -> Address;
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self) -> Address {
        (*self).to_address()
    }
}

impl ToAddress for Address {
    fn to_address(&self) -> Address {
        self.clone()
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Address {
        Address::new(self)
    }
}

impl<N: AsRef<str>, E: AsRef<str>> ToAddress for (N, E) {
    fn to_address(&self) -> Address {
        Address::with_name(self.0.as_ref(), self.1.as_ref())
    }
}
