//! Transport clients for PinPoint.
//!
//! Provides the [`Transport`] seam used by the session controller and two
//! HTTP implementations: one for the PinPoint chat proxy and one for an
//! OpenAI-compatible chat-completions provider.

pub mod error;
pub mod http;
pub mod provider;
pub mod transport;

pub use error::ClientError;
pub use http::HttpTransport;
pub use provider::{OpenAiTransport, ProviderConfig};
pub use transport::Transport;

/// Message used when the backend gives no usable error text.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to get response from AI";
