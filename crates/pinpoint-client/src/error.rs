//! Error types for the transport clients.

use thiserror::Error;

use pinpoint_core::{Failure, FailureKind};

/// Errors that can occur during an exchange with a backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed to establish connection.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Backend answered with a failure status.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Backend reply could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Failure kind this error belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Config(_) => FailureKind::Config,
            Self::Connection(_) => FailureKind::Network,
            Self::Upstream { .. } => FailureKind::Upstream,
            Self::Decode(_) => FailureKind::Protocol,
            Self::Http(e) if e.is_connect() || e.is_timeout() => FailureKind::Network,
            Self::Http(e) if e.is_decode() => FailureKind::Protocol,
            Self::Http(_) => FailureKind::Unknown,
        }
    }

    /// Convert into the failure shown to the user.
    pub fn into_failure(self) -> Failure {
        let kind = self.kind();
        match self {
            Self::Config(message) => Failure::new(kind, message),
            Self::Upstream { status, message } => Failure::upstream(status, message),
            _ => Failure::new(kind, user_message(kind)),
        }
    }
}

fn user_message(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Network => "Could not reach the server. Please try again.",
        FailureKind::Protocol => "Failed to decode the response from AI.",
        _ => "An unexpected error occurred",
    }
}
