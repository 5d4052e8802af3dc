//! Bodies exchanged on `POST /api/chat`.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Request body for the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation so far, ending with the pending user message.
    pub messages: Vec<Message>,
    /// Highlighted span, empty when none.
    #[serde(default)]
    pub highlighted_text: String,
}

/// Success body for the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Failure body for the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
