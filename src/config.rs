//! Orchestrator configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! Components receive the config by reference at construction; there is no
//! ambient global state.

use std::time::Duration;

use crate::error::RagError;

/// Default chat/planning model.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
/// Default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Default embedding vector dimension.
const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;
/// Default maximum ReAct loop iterations. A budget for cost and latency,
/// not correctness: the loop terminates cleanly when it is exhausted.
const DEFAULT_MAX_STEPS: usize = 5;
/// Default sampling temperature for planning calls.
const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the RAG orchestrator.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// LLM provider name (`"openai"` or `"groq"`).
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model for agent planning and answer generation.
    pub chat_model: String,
    /// Model for route classification. Defaults to `chat_model`.
    pub router_model: String,
    /// Model for embeddings.
    pub embedding_model: String,
    /// Embedding vector dimension.
    pub embedding_dimension: usize,
    /// Maximum ReAct loop iterations before the executor gives up.
    pub max_steps: usize,
    /// Sampling temperature for planning and generation calls.
    pub temperature: f32,
    /// API key for the Serper web search API, if web search is used.
    pub serper_api_key: Option<String>,
    /// Request timeout for outbound HTTP calls.
    pub timeout: Duration,
}

impl RagConfig {
    /// Creates a new builder for `RagConfig`.
    #[must_use]
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, RagError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    chat_model: Option<String>,
    router_model: Option<String>,
    embedding_model: Option<String>,
    embedding_dimension: Option<usize>,
    max_steps: Option<usize>,
    temperature: Option<f32>,
    serper_api_key: Option<String>,
    timeout: Option<Duration>,
}

impl RagConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("RAGENT_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("GROQ_API_KEY"))
                .or_else(|_| std::env::var("RAGENT_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("RAGENT_BASE_URL").ok();
        }
        if self.chat_model.is_none() {
            self.chat_model = std::env::var("RAGENT_CHAT_MODEL").ok();
        }
        if self.router_model.is_none() {
            self.router_model = std::env::var("RAGENT_ROUTER_MODEL").ok();
        }
        if self.embedding_model.is_none() {
            self.embedding_model = std::env::var("RAGENT_EMBEDDING_MODEL").ok();
        }
        if self.embedding_dimension.is_none() {
            self.embedding_dimension = std::env::var("RAGENT_EMBEDDING_DIMENSION")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.max_steps.is_none() {
            self.max_steps = std::env::var("RAGENT_MAX_STEPS")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.serper_api_key.is_none() {
            self.serper_api_key = std::env::var("SERPER_API_KEY").ok();
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the chat/planning model.
    #[must_use]
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = Some(model.into());
        self
    }

    /// Sets the router model.
    #[must_use]
    pub fn router_model(mut self, model: impl Into<String>) -> Self {
        self.router_model = Some(model.into());
        self
    }

    /// Sets the embedding model.
    #[must_use]
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = Some(model.into());
        self
    }

    /// Sets the embedding dimension.
    #[must_use]
    pub const fn embedding_dimension(mut self, dim: usize) -> Self {
        self.embedding_dimension = Some(dim);
        self
    }

    /// Sets the maximum ReAct loop iterations.
    #[must_use]
    pub const fn max_steps(mut self, n: usize) -> Self {
        self.max_steps = Some(n);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the Serper web search API key.
    #[must_use]
    pub fn serper_api_key(mut self, key: impl Into<String>) -> Self {
        self.serper_api_key = Some(key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Builds the [`RagConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<RagConfig, RagError> {
        let api_key = self.api_key.ok_or(RagError::ApiKeyMissing)?;

        let chat_model = self
            .chat_model
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let router_model = self.router_model.unwrap_or_else(|| chat_model.clone());

        Ok(RagConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            chat_model,
            router_model,
            embedding_model: self
                .embedding_model
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dimension: self
                .embedding_dimension
                .unwrap_or(DEFAULT_EMBEDDING_DIMENSION),
            max_steps: self.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            serper_api_key: self.serper_api_key,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }
}
