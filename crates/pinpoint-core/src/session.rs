//! Session store: ordered history, highlight and status.

use serde::{Deserialize, Serialize};

use crate::chat::Message;
use crate::error::CoreError;
use crate::highlight::HighlightCapture;

/// Status of the chat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Ready to accept a submission.
    #[default]
    Idle,
    /// A request is in flight.
    Waiting,
    /// A failure is being surfaced; returns to Idle once acknowledged.
    Failed,
}

impl SessionStatus {
    /// Returns true if a new submission may be accepted.
    pub fn accepts_submissions(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if moving from `self` to `to` is a legal transition.
    pub fn can_transition_to(&self, to: SessionStatus) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Waiting)
                | (Self::Waiting, Self::Idle)
                | (Self::Waiting, Self::Failed)
                | (Self::Failed, Self::Idle)
        )
    }
}

/// The single ongoing conversation.
///
/// History is append-only and never stores synthetic `system` entries.
#[derive(Debug, Clone, Default)]
pub struct Session {
    history: Vec<Message>,
    highlight: HighlightCapture,
    status: SessionStatus,
}

impl Session {
    /// Create an idle session with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in submission order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The span captured for the next submission.
    pub fn highlighted(&self) -> Option<&str> {
        self.highlight.current()
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Append a message to the history.
    pub fn append(&mut self, message: Message) -> Result<(), CoreError> {
        if !message.role().is_history_role() {
            return Err(CoreError::InvalidMessage(format!(
                "role '{}' cannot be stored in history",
                message.role().as_str()
            )));
        }
        self.history.push(message);
        Ok(())
    }

    /// Move to a new status, enforcing the state machine.
    pub fn transition(&mut self, to: SessionStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(to) {
            return Err(CoreError::InvalidStateTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Forward a selection change to the highlight capture.
    pub fn capture_selection(&mut self, selected: &str) -> bool {
        self.highlight.on_selection_changed(selected)
    }

    /// Drop the highlighted span.
    pub fn clear_highlight(&mut self) {
        self.highlight.clear();
    }
}
