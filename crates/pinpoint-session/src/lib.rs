//! PinPoint Session Controller
//!
//! Owns the single chat [`Session`](pinpoint_core::Session) and drives its
//! state machine. Submissions, selection changes and transport completions
//! are all funneled through one actor task, so the session has exactly one
//! writer. Readers subscribe to [`SessionSnapshot`]s.

pub mod actor;
pub mod controller;
pub mod error;
pub mod event;

pub use actor::{spawn_session, SessionHandle};
pub use controller::{PendingSubmission, Resolution, SessionController};
pub use error::SessionError;
pub use event::{SessionCommand, SessionSnapshot};

/// Message recorded when a fault escapes the transport.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";
