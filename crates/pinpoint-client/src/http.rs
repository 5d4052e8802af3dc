//! HTTP transport for the PinPoint chat proxy.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use pinpoint_core::{ChatResponse, ErrorBody, InboundResult, OutboundRequest};

use crate::error::ClientError;
use crate::transport::Transport;
use crate::FALLBACK_ERROR_MESSAGE;

/// Transport that posts to `{base_url}/api/chat`.
pub struct HttpTransport {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a transport whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check if the proxy is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/health", self.base_url);
        debug!(url = %url, "Checking health");

        let response = self.inner.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    async fn exchange(&self, request: &OutboundRequest) -> Result<String, ClientError> {
        let url = format!("{}/api/chat", self.base_url);
        debug!(
            url = %url,
            messages = request.messages.len(),
            highlighted = request.highlighted_text.is_some(),
            "POST chat request"
        );

        let response = self
            .inner
            .post(&url)
            .json(&request.to_chat_request())
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
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
            return Err(ClientError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> InboundResult {
        match self.exchange(request).await {
            Ok(content) => InboundResult::success(content),
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "Chat request failed");
                e.into_failure().into()
            }
        }
    }
}
