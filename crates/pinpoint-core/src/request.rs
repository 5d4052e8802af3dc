//! Request builder: history + pending message + highlight -> outbound request.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatRole, Message};
use crate::wire::ChatRequest;

/// A request ready to be handed to a transport.
///
/// Built fresh for every submission and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRequest {
    /// Conversation in order, followed by the synthetic highlight entry if any.
    pub messages: Vec<Message>,
    /// Content of the synthetic highlight entry.
    pub highlight_context: Option<String>,
    /// The raw highlighted span the context was built from.
    pub highlighted_text: Option<String>,
}

impl OutboundRequest {
    /// Build a request from an already-assembled conversation.
    ///
    /// The synthetic `system` entry is appended only when `highlighted` is
    /// present and non-empty.
    pub fn from_conversation(conversation: Vec<Message>, highlighted: Option<&str>) -> Self {
        let highlighted = highlighted.filter(|text| !text.is_empty());
        let mut messages = conversation;

        let highlight_context = highlighted.map(highlight_instruction);
        if let Some(context) = &highlight_context {
            messages.push(Message::system(context.clone()));
        }

        Self {
            messages,
            highlight_context,
            highlighted_text: highlighted.map(str::to_string),
        }
    }

    /// Rebuild a request from a proxy request body.
    pub fn from_chat_request(request: ChatRequest) -> Self {
        let highlighted = request.highlighted_text;
        Self::from_conversation(request.messages, Some(highlighted.as_str()))
    }

    /// The conversation without the synthetic highlight entry.
    pub fn conversation(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|message| message.role() != ChatRole::System)
    }

    /// Body for `POST /api/chat`.
    pub fn to_chat_request(&self) -> ChatRequest {
        ChatRequest {
            messages: self.conversation().cloned().collect(),
            highlighted_text: self.highlighted_text.clone().unwrap_or_default(),
        }
    }
}

/// Instruction telling the backend which span the user highlighted.
pub fn highlight_instruction(highlighted: &str) -> String {
    format!(
        "The user has highlighted the following text: \"{}\". \
         Please consider this context when answering the next question.",
        highlighted
    )
}

/// Build the outbound request for a submission.
///
/// Pure: the same history, pending message and highlight always yield the
/// same request.
pub fn build_request(
    history: &[Message],
    pending: &Message,
    highlighted: Option<&str>,
) -> OutboundRequest {
    let mut conversation = Vec::with_capacity(history.len() + 1);
    conversation.extend_from_slice(history);
    conversation.push(pending.clone());
    OutboundRequest::from_conversation(conversation, highlighted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_is_injected_after_user_message() {
        let pending = Message::user("What does X mean?");
        let request = build_request(&[], &pending, Some("the quick brown fox"));

        let n = request.messages.len();
        assert_eq!(n, 2);
        assert_eq!(request.messages[n - 2], Message::user("What does X mean?"));
        assert_eq!(request.messages[n - 1].role(), ChatRole::System);
        assert!(request.messages[n - 1]
            .content()
            .contains("the quick brown fox"));
        assert_eq!(
            request.highlight_context.as_deref(),
            Some(request.messages[n - 1].content())
        );
    }

    #[test]
    fn test_empty_highlight_is_not_injected() {
        let pending = Message::user("What does X mean?");
        let request = build_request(&[], &pending, Some(""));

        assert_eq!(request.messages, vec![pending]);
        assert!(request
            .messages
            .iter()
            .all(|m| m.role() != ChatRole::System));
        assert_eq!(request.highlight_context, None);
        assert_eq!(request.highlighted_text, None);
    }

    #[test]
    fn test_history_order_is_preserved() {
        let history = vec![
            Message::user("first"),
            Message::assistant("reply"),
            Message::error("Failed"),
        ];
        let request = build_request(&history, &Message::user("second"), None);

        let contents: Vec<&str> = request.messages.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "reply", "Failed", "second"]);
    }

    #[test]
    fn test_builder_is_deterministic() {
        let history = vec![Message::user("a"), Message::assistant("b")];
        let pending = Message::user("c");
        assert_eq!(
            build_request(&history, &pending, Some("span")),
            build_request(&history, &pending, Some("span"))
        );
    }

    #[test]
    fn test_chat_request_excludes_synthetic_entry() {
        let request = build_request(&[], &Message::user("why?"), Some("fox"));
        let body = request.to_chat_request();

        assert_eq!(body.messages, vec![Message::user("why?")]);
        assert_eq!(body.highlighted_text, "fox");
    }

    #[test]
    fn test_round_trip_through_chat_request() {
        let history = vec![Message::user("a"), Message::assistant("b")];
        let original = build_request(&history, &Message::user("c"), Some("b"));
        let rebuilt = OutboundRequest::from_chat_request(original.to_chat_request());
        assert_eq!(rebuilt, original);
    }
}
