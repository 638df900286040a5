//! Wire types shared by the relay handlers and the upstream adapter.

use serde::{Deserialize, Serialize};

/// A single turn in a conversation. The last element of a request's message
/// array is the current user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

/// One block of response content. Only text blocks exist today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self { kind: "text".to_string(), text: text.into() }
    }
}

/// The unified response shape returned to the caller regardless of which
/// provider (or the demo responder) produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub content: Vec<ContentBlock>,
    /// Upstream model identifier; absent on demo responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl NormalizedResponse {
    /// Single-text-block response with no model attribution.
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![ContentBlock::text(text)], model: None }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// GET /health payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Display name of the provider that would serve the next request,
    /// or "Demo" when no credential is configured.
    pub api: String,
    pub timestamp: String,
}
