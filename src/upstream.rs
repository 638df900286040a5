//! Upstream call adapter: shapes provider-specific requests and maps the
//! responses back into the normalized shape.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::providers::{ProviderConfig, ProviderKind};
use crate::types::{ChatMessage, NormalizedResponse};

/// Why an upstream call produced no usable response.
///
/// All three cases are non-fatal to the end user; the orchestrator maps
/// them to the demo responder.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{provider} unreachable: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("unexpected payload from {provider}: {reason}")]
    Payload {
        provider: &'static str,
        reason: String,
    },
}

/// HTTP client shared across requests. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new(timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// One chat round trip against `provider`. No retries.
    pub async fn chat(
        &self,
        provider: &ProviderConfig,
        messages: &[ChatMessage],
    ) -> Result<NormalizedResponse, UpstreamError> {
        let name = provider.kind.name();
        let body = build_request_body(provider.kind, messages);

        debug!(provider = name, "calling upstream");

        let response = self
            .client
            .post(&provider.endpoint)
            .header("Authorization", format!("Bearer {}", provider.credential))
            .json(&body)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { provider: name, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { provider: name, status, body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|source| UpstreamError::Transport { provider: name, source })?;

        extract_response(provider.kind, &payload)
    }
}

/// Provider-specific request body.
fn build_request_body(kind: ProviderKind, messages: &[ChatMessage]) -> Value {
    match kind {
        ProviderKind::Groq => json!({
            "model": kind.model(),
            "messages": messages,
            "max_tokens": 1000,
            "temperature": 0.7,
        }),
        ProviderKind::Together => json!({
            "model": kind.model(),
            "messages": messages,
            "max_tokens": 1000,
        }),
        // The inference endpoint takes a bare prompt, not a message array.
        ProviderKind::HuggingFace => {
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
            json!({ "inputs": last })
        }
    }
}

/// Pull the completion text out of the provider payload.
fn extract_response(
    kind: ProviderKind,
    payload: &Value,
) -> Result<NormalizedResponse, UpstreamError> {
    let text = match kind {
        ProviderKind::Groq | ProviderKind::Together => payload
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| UpstreamError::Payload {
                provider: kind.name(),
                reason: "missing choices[0].message.content".to_string(),
            })?,
        ProviderKind::HuggingFace => payload
            .pointer("/0/generated_text")
            .and_then(Value::as_str)
            .ok_or_else(|| UpstreamError::Payload {
                provider: kind.name(),
                reason: "missing [0].generated_text".to_string(),
            })?,
    };

    Ok(NormalizedResponse::text(text).with_model(kind.model()))
}
