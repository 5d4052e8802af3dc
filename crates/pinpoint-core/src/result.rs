//! Outcome of a transport exchange.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure taxonomy for a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Required credential missing; nothing was sent.
    Config,
    /// Backend could not be reached.
    Network,
    /// Backend reachable but reported a failure.
    Upstream,
    /// Backend reply did not have the expected shape.
    Protocol,
    /// Anything else, including faults outside the transport.
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Network => "network",
            Self::Upstream => "upstream",
            Self::Protocol => "protocol",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    /// Message shown to the user.
    pub message: String,
    /// HTTP status reported by the backend, for upstream failures.
    pub status: Option<u16>,
}

impl Failure {
    /// Create a failure without a status code.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Create an upstream failure carrying the backend status.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Upstream,
            message: message.into(),
            status: Some(status),
        }
    }
}

/// Result produced by a transport and consumed once by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InboundResult {
    /// Backend replied with content.
    Success { content: String },
    /// Exchange failed.
    Failure(Failure),
}

impl InboundResult {
    /// Create a success result.
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
        }
    }

    /// Create a failure result.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(kind, message))
    }

    /// Returns true for a success result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Failure> for InboundResult {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}
