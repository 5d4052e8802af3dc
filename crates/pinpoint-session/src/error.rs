//! Session handle errors.

use thiserror::Error;

use pinpoint_core::CoreError;

/// Errors returned by [`SessionHandle`](crate::SessionHandle) calls.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The controller refused the command.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The session actor is no longer running.
    #[error("Session closed")]
    Closed,
}
