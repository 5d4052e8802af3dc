//! Core domain errors.

use thiserror::Error;

use crate::session::SessionStatus;

/// Core domain errors for PinPoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Submission text was empty after trimming.
    #[error("Message is empty")]
    EmptySubmission,

    /// A request is already in flight.
    #[error("A request is already in flight")]
    RequestInFlight,

    /// The last failure has not been shown to the user yet.
    #[error("The last failure has not been acknowledged")]
    FailureNotAcknowledged,

    /// Message cannot be stored in the history.
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Result does not belong to the in-flight request.
    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    /// Invalid state transition.
    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidStateTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
}
