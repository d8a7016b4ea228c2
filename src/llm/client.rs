//! LLM gateway: provider factory and completion client.
//!
//! The provider is resolved once at construction via exhaustive matching,
//! so adding a provider is a closed, compile-checked change.

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::RagError;
use crate::llm::message::{ChatMessage, ChatRequest, system_message};
use crate::llm::provider::LlmProvider;
use crate::llm::providers::{GroqProvider, OpenAiProvider};

/// Creates an [`LlmProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default) — `OpenAI`-compatible APIs via `async-openai`
/// - `"groq"` — Groq's `OpenAI`-compatible endpoint
///
/// # Errors
///
/// Returns [`RagError::UnsupportedProvider`] for unknown provider names.
pub fn create_provider(config: &RagConfig) -> Result<Arc<dyn LlmProvider>, RagError> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config))),
        "groq" => Ok(Arc::new(GroqProvider::new(config))),
        other => Err(RagError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}

/// Per-call completion options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions {
    /// Sampling temperature override. Falls back to the configured default.
    pub temperature: Option<f32>,
    /// Request a response constrained to a single JSON object.
    pub json_mode: bool,
}

impl CompletionOptions {
    /// Options for a strict-JSON completion at temperature 0.
    #[must_use]
    pub const fn json() -> Self {
        Self {
            temperature: Some(0.0),
            json_mode: true,
        }
    }
}

/// Uniform completion interface over the configured LLM provider.
///
/// No retries at this layer: retry policy belongs to callers, and the
/// control loop deliberately fails fast on planning errors.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
    default_temperature: f32,
}

impl LlmClient {
    /// Creates a client from configuration, resolving the provider.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::UnsupportedProvider`] for unknown providers.
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        let provider = create_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Creates a client over an existing provider (used by tests and by
    /// components that share one transport).
    #[must_use]
    pub fn with_provider(provider: Arc<dyn LlmProvider>, config: &RagConfig) -> Self {
        Self {
            provider,
            model: config.chat_model.clone(),
            default_temperature: config.temperature,
        }
    }

    /// Overrides the target model (e.g. a cheaper model for routing).
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Name of the underlying provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Model this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Executes a completion: system prompt + conversation → text.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Completion`] wrapping the upstream message on
    /// any call failure.
    pub async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, RagError> {
        let mut chat_messages = Vec::with_capacity(messages.len() + 1);
        chat_messages.push(system_message(system_prompt));
        chat_messages.extend_from_slice(messages);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: chat_messages,
            temperature: Some(options.temperature.unwrap_or(self.default_temperature)),
            json_mode: options.json_mode,
        };

        let response = self.provider.chat(&request).await?;
        Ok(response.content)
    }
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish()
    }
}
