//! Commands sent to the session actor and the state it publishes.

use tokio::sync::oneshot;

use pinpoint_core::{CoreError, Failure, Message, RequestId, SessionStatus};

/// Commands sent from the display layer to the session actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Submit a user message.
    Submit {
        text: String,
        reply: oneshot::Sender<Result<RequestId, CoreError>>,
    },

    /// The user's selection changed.
    SelectionChanged {
        text: String,
        reply: oneshot::Sender<bool>,
    },

    /// The display layer has shown the failure; return to Idle.
    Acknowledge {
        reply: oneshot::Sender<Result<(), CoreError>>,
    },

    /// Stop the actor.
    Shutdown,
}

/// Snapshot of the session for rendering (no async, no locks).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Messages in submission order.
    pub history: Vec<Message>,

    /// Span that will be attached to the next submission.
    pub highlighted: Option<String>,

    /// Current status.
    pub status: SessionStatus,

    /// Most recent failure, kept until the next accepted submission.
    pub last_failure: Option<Failure>,
}
