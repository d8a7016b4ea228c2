//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls. This keeps the control loop decoupled
//! from any particular LLM vendor.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::RagError;

/// Trait for LLM provider backends.
///
/// Implementations handle the transport layer (HTTP, SDK calls) for a
/// specific provider while presenting a uniform interface to the gateway.
/// Retry policy belongs to callers, not implementations.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`, `"groq"`).
    fn name(&self) -> &'static str;

    /// Whether the provider can enforce JSON-object output natively.
    ///
    /// When `false`, `json_mode` requests fall back to prompt instruction
    /// and the caller must validate the response.
    fn supports_json_mode(&self) -> bool {
        true
    }

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Completion`] on API failures, timeouts, or
    /// transport errors.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError>;
}
