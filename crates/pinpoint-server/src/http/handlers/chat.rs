//! Chat proxy handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use pinpoint_core::{
    ChatRequest, ChatResponse, ErrorBody, Failure, FailureKind, InboundResult, OutboundRequest,
};

use crate::state::AppState;

/// Chat endpoint.
///
/// Rebuilds the outbound request (conversation plus highlight instruction),
/// sends it to the provider and relays the reply or the failure message.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Malformed chat request");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    if body.messages.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "messages must not be empty");
    }

    let request = OutboundRequest::from_chat_request(body);
    info!(
        messages = request.messages.len(),
        highlighted = request.highlight_context.is_some(),
        "Chat request"
    );

    match state.transport.send(&request).await {
        InboundResult::Success { content } => {
            (StatusCode::OK, Json(ChatResponse { response: content })).into_response()
        }
        InboundResult::Failure(failure) => {
            let status = status_for(&failure);
            warn!(kind = %failure.kind, status = %status, "Chat request failed");
            error_response(status, failure.message)
        }
    }
}

/// HTTP status used to relay a failure.
fn status_for(failure: &Failure) -> StatusCode {
    match failure.kind {
        FailureKind::Upstream => failure
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|code| !code.is_success())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        FailureKind::Network | FailureKind::Protocol => StatusCode::BAD_GATEWAY,
        FailureKind::Config | FailureKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pinpoint_client::Transport;
    use pinpoint_core::{ChatRole, Message};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use crate::http::create_router;

    struct FixedTransport {
        result: InboundResult,
        sent: Mutex<Vec<OutboundRequest>>,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, request: &OutboundRequest) -> InboundResult {
            self.sent.lock().unwrap().push(request.clone());
            self.result.clone()
        }
    }

    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn send(&self, _request: &OutboundRequest) -> InboundResult {
            panic!("provider exploded");
        }
    }

    async fn serve(transport: Arc<dyn Transport>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = create_router(AppState::new(transport));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fixed(result: InboundResult) -> Arc<FixedTransport> {
        Arc::new(FixedTransport {
            result,
            sent: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_chat_success_injects_highlight() {
        let transport = fixed(InboundResult::success("It means Y."));
        let base = serve(transport.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({
                "messages": [{"role": "user", "content": "What does X mean?"}],
                "highlightedText": "the quick brown fox"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"response": "It means Y."}));

        let sent = transport.sent.lock().unwrap();
        let messages = &sent[0].messages;
        assert_eq!(messages[0], Message::user("What does X mean?"));
        assert_eq!(messages[1].role(), ChatRole::System);
        assert!(messages[1].content().contains("the quick brown fox"));
    }

    #[tokio::test]
    async fn test_upstream_status_is_relayed() {
        let transport = fixed(InboundResult::Failure(Failure::upstream(503, "rate limited")));
        let base = serve(transport).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"messages": [{"role": "user", "content": "hi"}], "highlightedText": ""}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 503);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "rate limited"}));
    }

    #[tokio::test]
    async fn test_missing_key_is_server_error() {
        let transport = fixed(InboundResult::failure(
            FailureKind::Config,
            "OPENAI_API_KEY is not set in the environment variables",
        ));
        let base = serve(transport).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let transport = fixed(InboundResult::success("unused"));
        let base = serve(transport.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_conversation_is_bad_request() {
        let base = serve(fixed(InboundResult::success("unused"))).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"messages": [], "highlightedText": ""}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_panic_is_caught() {
        let base = serve(Arc::new(PanickingTransport)).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&json!({"messages": [{"role": "user", "content": "hi"}]}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body,
            json!({"error": "An unexpected error occurred on the server"})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let base = serve(fixed(InboundResult::success("unused"))).await;
        let body: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&Failure::new(FailureKind::Network, "down")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Failure::new(FailureKind::Upstream, "no status")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Failure::upstream(429, "slow down")),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for(&Failure::new(FailureKind::Unknown, "?")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
