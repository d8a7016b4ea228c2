//! Embedding gateway: provider trait, factory, and the validating client.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::RagConfig;
use crate::error::RagError;

pub use openai::OpenAiEmbeddingProvider;

/// Trait for embedding provider backends.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name.
    fn name(&self) -> &'static str;

    /// Embeds a single text into a fixed-dimension vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] on upstream failure.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Embeds a batch of texts, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] on upstream failure.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}

/// Creates an [`EmbeddingProvider`] based on the configured provider name.
///
/// # Errors
///
/// Returns [`RagError::UnsupportedOperation`] for providers that have no
/// embedding API (Groq), and [`RagError::UnsupportedProvider`] for unknown
/// names. No placeholder vectors, ever.
pub fn create_provider(config: &RagConfig) -> Result<Arc<dyn EmbeddingProvider>, RagError> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiEmbeddingProvider::new(config))),
        "groq" => Err(RagError::UnsupportedOperation {
            provider: "groq".to_string(),
            operation: "embeddings".to_string(),
        }),
        other => Err(RagError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}

/// Validating embedding client over the configured provider.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
}

impl EmbeddingClient {
    /// Creates a client from configuration, resolving the provider.
    ///
    /// # Errors
    ///
    /// See [`create_provider`].
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        let provider = create_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Creates a client over an existing provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn EmbeddingProvider>, config: &RagConfig) -> Self {
        Self {
            provider,
            dimension: config.embedding_dimension,
        }
    }

    /// Configured embedding dimension.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embeds a single text.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] for empty or whitespace-only text,
    /// [`RagError::Embedding`] on upstream failure.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Validation {
                message: "embedding text cannot be empty".to_string(),
            });
        }
        self.provider.embed_one(text).await
    }

    /// Embeds a batch of texts, preserving order.
    ///
    /// An empty batch returns an empty result without a provider call.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] if any text is empty or
    /// whitespace-only, [`RagError::Embedding`] on upstream failure.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(pos) = texts.iter().position(|t| t.trim().is_empty()) {
            return Err(RagError::Validation {
                message: format!("embedding text at index {pos} is empty"),
            });
        }
        self.provider.embed_many(texts).await
    }
}

impl std::fmt::Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("provider", &self.provider.name())
            .field("dimension", &self.dimension)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockEmbedding;
    use super::*;

    fn client(dim: usize) -> EmbeddingClient {
        let config = RagConfig::builder()
            .api_key("test")
            .embedding_dimension(dim)
            .build()
            .unwrap_or_else(|_| unreachable!());
        EmbeddingClient::with_provider(Arc::new(MockEmbedding { dim }), &config)
    }

    #[tokio::test]
    async fn test_embed_returns_configured_dimension() {
        let client = client(8);
        let vector = client
            .embed("hello")
            .await
            .unwrap_or_else(|e| panic!("embed failed: {e}"));
        assert_eq!(vector.len(), 8);
        assert_eq!(client.dimension(), 8);
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_text() {
        let client = client(4);
        assert!(matches!(
            client.embed("").await,
            Err(RagError::Validation { .. })
        ));
        assert!(matches!(
            client.embed("   \n\t").await,
            Err(RagError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_embed_batch_empty_is_noop() {
        let client = client(4);
        let result = client
            .embed_batch(&[])
            .await
            .unwrap_or_else(|e| panic!("embed_batch failed: {e}"));
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_embed_batch_rejects_blank_entry() {
        let client = client(4);
        let texts = vec!["ok".to_string(), "  ".to_string()];
        let result = client.embed_batch(&texts).await;
        assert!(matches!(
            result,
            Err(RagError::Validation { message }) if message.contains("index 1")
        ));
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order() {
        let client = client(2);
        let texts = vec!["a".to_string(), "bbb".to_string()];
        let vectors = client
            .embed_batch(&texts)
            .await
            .unwrap_or_else(|e| panic!("embed_batch failed: {e}"));
        assert_eq!(vectors.len(), 2);
        assert!((vectors[0][0] - 1.0).abs() < f32::EPSILON);
        assert!((vectors[1][0] - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_groq_has_no_embeddings() {
        let config = RagConfig::builder()
            .api_key("test")
            .provider("groq")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let result = create_provider(&config);
        assert!(matches!(
            result,
            Err(RagError::UnsupportedOperation { provider, operation })
                if provider == "groq" && operation == "embeddings"
        ));
    }

    #[test]
    fn test_unknown_embedding_provider() {
        let config = RagConfig::builder()
            .api_key("test")
            .provider("mistral")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            create_provider(&config),
            Err(RagError::UnsupportedProvider { .. })
        ));
    }
}
