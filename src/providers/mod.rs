//! Provider client implementations.
//!
//! Each client implements the [`NotifyClient`](crate::NotifyClient) trait.
//!
//! ## Available Clients
//!
//! | Client | Feature Flag | Description |
//! |--------|-------------|-------------|
//! | [`NotifyApiClient`] | `http` (default) | GOV.UK Notify REST API |
//! | [`LocalClient`] | (none) | In-memory recording for dev/testing |
//! | [`LoggerClient`] | (none) | Logs notifications without sending |

#[cfg(feature = "http")]
mod notify;
#[cfg(feature = "http")]
pub use notify::NotifyApiClient;

mod local;
pub use local::LocalClient;

mod logger;
pub use logger::LoggerClient;
