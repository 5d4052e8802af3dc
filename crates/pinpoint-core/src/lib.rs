//! PinPoint Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Async runtime
//! - Terminal rendering
//!
//! It holds the conversation model, the session store, highlight capture and
//! the request builder that turns a history plus an optional highlighted span
//! into a single outbound request.

pub mod chat;
pub mod error;
pub mod highlight;
pub mod ids;
pub mod request;
pub mod result;
pub mod session;
pub mod wire;

// Re-export commonly used types
pub use chat::{ChatRole, Message};
pub use error::CoreError;
pub use highlight::HighlightCapture;
pub use ids::RequestId;
pub use request::{build_request, highlight_instruction, OutboundRequest};
pub use result::{Failure, FailureKind, InboundResult};
pub use session::{Session, SessionStatus};
pub use wire::{ChatRequest, ChatResponse, ErrorBody};
