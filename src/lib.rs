//! Thin HTTP relay for chat-style LLM requests.
//!
//! Forwards `/api/chat` requests to the highest-priority provider with a
//! credential configured (Groq, then Together AI, then HuggingFace),
//! normalizes the provider response into a single shape, and answers from
//! the built-in demo responder when no credential is set or the upstream
//! call fails.
//!
//! ## Module Structure
//!
//! - `types`: wire types shared across the crate
//! - `config`: environment-sourced relay configuration
//! - `providers`: provider table and availability resolution
//! - `upstream`: provider-specific request shaping and response extraction
//! - `demo`: canned keyword responder
//! - `server`: axum router and request orchestration

pub mod config;
pub mod demo;
pub mod providers;
pub mod server;
pub mod types;
pub mod upstream;

pub use config::RelayConfig;
pub use providers::{resolve_active, ProviderConfig, ProviderKind};
pub use types::{ChatMessage, ContentBlock, NormalizedResponse};
pub use upstream::{UpstreamClient, UpstreamError};
