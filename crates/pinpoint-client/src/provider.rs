//! Transport for an OpenAI-compatible chat-completions provider.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pinpoint_core::{ChatRole, InboundResult, OutboundRequest};

use crate::error::ClientError;
use crate::transport::Transport;
use crate::FALLBACK_ERROR_MESSAGE;

const DEFAULT_MODEL: &str = "gpt-4";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Secret credential. Its absence is reported per request.
    pub api_key: Option<String>,

    /// Model name sent with every completion request.
    pub model: String,

    /// Base URL of the provider API (without `/chat/completions`).
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// - `OPENAI_API_KEY` (optional at load time)
    /// - `OPENAI_MODEL` (default `gpt-4`)
    /// - `OPENAI_BASE_URL` (default `https://api.openai.com/v1`)
    /// - `PINPOINT_REQUEST_TIMEOUT_SECS` (default 60)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// A blank key counts as missing and an unparsable timeout falls back to
    /// the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            model: lookup("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: lookup("PINPOINT_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Transport that calls the provider's chat-completions endpoint directly.
pub struct OpenAiTransport {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiTransport {
    /// Create a transport from configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Model this transport requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &OutboundRequest) -> Result<String, ClientError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| {
                ClientError::Config(
                    "OPENAI_API_KEY is not set in the environment variables".to_string(),
                )
            })?;

        // Error entries are display-only; the provider only knows user/assistant/system.
        let messages = request
            .messages
            .iter()
            .filter(|m| m.role() != ChatRole::Error)
            .map(|m| CompletionMessage {
                role: m.role().as_str(),
                content: m.content(),
            })
            .collect();

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, model = %self.config.model, "POST completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ClientError::Connection(e.to_string())
                } else {
                    ClientError::Http(e)
                }
            })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Upstream {
                status: status.as_u16(),
                message: provider_error_message(&text),
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::Decode("provider returned no content".to_string()))
    }
}

#[async_trait]
impl Transport for OpenAiTransport {
    async fn send(&self, request: &OutboundRequest) -> InboundResult {
        match self.complete(request).await {
            Ok(content) => InboundResult::success(content),
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "Provider request failed");
                e.into_failure().into()
            }
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<CompletionMessage<'a>>,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorResponse {
    error: ProviderError,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProviderError {
    Detailed { message: String },
    Text(String),
}

fn provider_error_message(body: &str) -> String {
    let message = match serde_json::from_str::<ProviderErrorResponse>(body) {
        Ok(ProviderErrorResponse {
            error: ProviderError::Detailed { message },
        }) => message,
        Ok(ProviderErrorResponse {
            error: ProviderError::Text(message),
        }) => message,
        Err(_) => String::new(),
    };

    if message.is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_core::{build_request, Failure, FailureKind, Message};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> OpenAiTransport {
        let config = ProviderConfig::default()
            .with_api_key("sk-test")
            .with_base_url(format!("{}/v1", server.uri()));
        OpenAiTransport::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_completion_with_highlight() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-4",
                "messages": [
                    {"role": "user", "content": "Summarize this."},
                    {"role": "assistant", "content": "It's about X."},
                    {"role": "user", "content": "What does X mean?"},
                    {"role": "system", "content": highlight_text("X")}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "X is a letter."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let history = vec![
            Message::user("Summarize this."),
            Message::error("Failed to get response from AI"),
            Message::assistant("It's about X."),
        ];
        let request = build_request(&history, &Message::user("What does X mean?"), Some("X"));
        let result = transport(&server).send(&request).await;
        assert_eq!(result, InboundResult::success("X is a letter."));
    }

    fn highlight_text(span: &str) -> String {
        pinpoint_core::highlight_instruction(span)
    }

    #[tokio::test]
    async fn test_missing_key_is_config_and_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = ProviderConfig::default().with_base_url(server.uri());
        let transport = OpenAiTransport::new(config).unwrap();
        let request = build_request(&[], &Message::user("hi"), None);

        match transport.send(&request).await {
            InboundResult::Failure(failure) => {
                assert_eq!(failure.kind, FailureKind::Config);
                assert!(failure.message.contains("OPENAI_API_KEY"));
            }
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_provider_error_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached", "type": "requests"}
            })))
            .mount(&server)
            .await;

        let request = build_request(&[], &Message::user("hi"), None);
        let result = transport(&server).send(&request).await;
        assert_eq!(
            result,
            InboundResult::Failure(Failure::upstream(429, "Rate limit reached"))
        );
    }

    #[tokio::test]
    async fn test_empty_choices_is_protocol() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let request = build_request(&[], &Message::user("hi"), None);
        match transport(&server).send(&request).await {
            InboundResult::Failure(failure) => assert_eq!(failure.kind, FailureKind::Protocol),
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = ProviderConfig::from_lookup(vars(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_blank_key_is_missing() {
        let config = ProviderConfig::from_lookup(vars(&[("OPENAI_API_KEY", "   ")]));
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_config_bad_timeout_falls_back() {
        let config = ProviderConfig::from_lookup(vars(&[
            ("OPENAI_API_KEY", "sk-live"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("PINPOINT_REQUEST_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.request_timeout, Duration::from_secs(60));

        let config =
            ProviderConfig::from_lookup(vars(&[("PINPOINT_REQUEST_TIMEOUT_SECS", "5")]));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_provider_error_message_variants() {
        assert_eq!(provider_error_message(r#"{"error":"quota"}"#), "quota");
        assert_eq!(
            provider_error_message(r#"{"error":{"message":"bad key"}}"#),
            "bad key"
        );
        assert_eq!(provider_error_message("not json"), FALLBACK_ERROR_MESSAGE);
    }
}
