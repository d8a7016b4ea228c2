//! `OpenAI` embedding provider using the `async-openai` crate.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequest, EmbeddingInput};
use async_trait::async_trait;

use super::EmbeddingProvider;
use crate::config::RagConfig;
use crate::error::RagError;

/// `OpenAI` embedding provider.
///
/// Requests the configured dimension explicitly so the store and the
/// gateway agree on vector size.
pub struct OpenAiEmbeddingProvider {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: u32,
}

impl OpenAiEmbeddingProvider {
    /// Creates a new provider from orchestrator configuration.
    #[must_use]
    pub fn new(config: &RagConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
            model: config.embedding_model.clone(),
            dimension: u32::try_from(config.embedding_dimension).unwrap_or(1536),
        }
    }

    async fn request(&self, input: EmbeddingInput) -> Result<Vec<Vec<f32>>, RagError> {
        let request = CreateEmbeddingRequest {
            model: self.model.clone(),
            input,
            dimensions: Some(self.dimension),
            ..Default::default()
        };

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| RagError::Embedding {
                message: e.to_string(),
            })?;

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl std::fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("model", &self.model)
            .field("dimension", &self.dimension)
            .finish()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut vectors = self.request(EmbeddingInput::String(text.to_string())).await?;
        vectors.pop().ok_or_else(|| RagError::Embedding {
            message: "provider returned no embedding data".to_string(),
        })
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        self.request(EmbeddingInput::StringArray(texts.to_vec()))
            .await
    }
}
