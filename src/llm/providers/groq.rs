//! Groq provider implementation.
//!
//! Groq exposes an `OpenAI`-compatible chat API, so this reuses the
//! `async-openai` client pointed at the Groq endpoint. Two differences
//! from the `OpenAI` provider: `response_format` is not sent (Groq's
//! JSON-object enforcement is unreliable across models, so callers rely
//! on prompt instruction and lenient parsing), and embeddings are not
//! available at all.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_trait::async_trait;

use crate::config::RagConfig;
use crate::error::RagError;
use crate::llm::message::{ChatRequest, ChatResponse};
use crate::llm::provider::LlmProvider;
use crate::llm::providers::openai::OpenAiProvider;

/// Default Groq API endpoint (OpenAI-compatible).
const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq LLM provider.
pub struct GroqProvider {
    client: Client<OpenAIConfig>,
}

impl GroqProvider {
    /// Creates a new provider from orchestrator configuration.
    ///
    /// `config.base_url` overrides the default Groq endpoint.
    #[must_use]
    pub fn new(config: &RagConfig) -> Self {
        let base = config.base_url.as_deref().unwrap_or(GROQ_API_BASE);
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(base);

        Self {
            client: Client::with_config(openai_config),
        }
    }
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn supports_json_mode(&self) -> bool {
        false
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError> {
        // enforce_json = false: JSON comes from prompt instruction only.
        let groq_request = OpenAiProvider::build_request(request, false);

        let response = self
            .client
            .chat()
            .create(groq_request)
            .await
            .map_err(|e| RagError::Completion {
                message: e.to_string(),
            })?;

        Ok(OpenAiProvider::convert_response(response))
    }
}
