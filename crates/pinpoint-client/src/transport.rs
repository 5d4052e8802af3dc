//! The request/response seam between the session and a backend.

use async_trait::async_trait;

use pinpoint_core::{InboundResult, OutboundRequest};

/// Performs one exchange with a backend.
///
/// Implementations never return an error: every outcome is folded into an
/// [`InboundResult`]. One call issues at most one network request and never
/// retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and classify the outcome.
    async fn send(&self, request: &OutboundRequest) -> InboundResult;
}

