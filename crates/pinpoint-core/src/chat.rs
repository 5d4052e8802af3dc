//! Chat message types for conversation history.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// User message (question/prompt).
    User,
    /// Assistant message (backend reply).
    Assistant,
    /// Failure surfaced to the user.
    Error,
    /// Synthetic instruction. Only ever appears in outbound requests.
    System,
}

impl ChatRole {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Error => "error",
            Self::System => "system",
        }
    }

    /// Returns true if messages with this role may be stored in a session history.
    pub fn is_history_role(&self) -> bool {
        !matches!(self, Self::System)
    }
}

/// A message in the conversation history.
///
/// Messages are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: ChatRole,
    content: String,
}

impl Message {
    /// Create a new chat message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Create an error message.
    pub fn error(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Error, content)
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Role of this message.
    pub fn role(&self) -> ChatRole {
        self.role
    }

    /// Message content.
    pub fn content(&self) -> &str {
        &self.content
    }
}
