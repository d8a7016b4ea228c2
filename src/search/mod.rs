//! Hybrid local search: vector similarity merged with keyword results.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::EmbeddingClient;
use crate::error::RagError;
use crate::store::{DocumentStore, VectorStore};

/// Which retrieval path produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitSource {
    /// Vector similarity search.
    Vector,
    /// Trigram/keyword search.
    Keyword,
}

/// One merged search result.
///
/// Ids are unique within a merged list. The list is owned by the caller
/// of [`LocalSearch::search`]; nothing retains or mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document id.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Document content.
    pub content: String,
    /// Similarity score from the producing path.
    pub score: f32,
    /// Which path produced this hit.
    pub source: HitSource,
}

/// Hybrid search over the document and vector stores.
#[derive(Clone)]
pub struct LocalSearch {
    embedding: EmbeddingClient,
    vectors: Arc<dyn VectorStore>,
    documents: Arc<dyn DocumentStore>,
}

impl LocalSearch {
    /// Default number of merged results.
    pub const DEFAULT_TOP_K: usize = 5;

    /// Creates a hybrid search over the given stores.
    #[must_use]
    pub fn new(
        embedding: EmbeddingClient,
        vectors: Arc<dyn VectorStore>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            embedding,
            vectors,
            documents,
        }
    }

    /// Searches both paths and merges into one deduplicated ranked list.
    ///
    /// Vector hits are taken first, in their score-descending order;
    /// keyword hits fill in afterwards, skipping ids already seen. On an
    /// id collision the vector copy wins, so its score and source survive.
    /// The merged list is truncated to `top_k` total, not per source.
    ///
    /// A vector hit whose document is missing from the document store is
    /// skipped rather than failing the search: partial results beat total
    /// failure here.
    ///
    /// # Errors
    ///
    /// Returns [`RagError`] on embedding or store failure.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, RagError> {
        let query_vector = self.embedding.embed(query).await?;
        let vector_hits = self.vectors.search(&query_vector, top_k, None).await?;
        let keyword_hits = self.documents.keyword_search(query, top_k).await?;

        let mut merged: Vec<SearchHit> = Vec::with_capacity(top_k);
        let mut seen: HashSet<String> = HashSet::new();

        for hit in vector_hits {
            if seen.contains(&hit.id) {
                continue;
            }
            let Some(doc) = self.documents.get(&hit.id).await? else {
                debug!(id = %hit.id, "vector hit references missing document, skipping");
                continue;
            };
            seen.insert(hit.id.clone());
            merged.push(SearchHit {
                id: doc.id,
                title: doc.title,
                content: doc.content,
                score: hit.score,
                source: HitSource::Vector,
            });
        }

        for scored in keyword_hits {
            if seen.contains(&scored.document.id) {
                continue;
            }
            seen.insert(scored.document.id.clone());
            merged.push(SearchHit {
                id: scored.document.id,
                title: scored.document.title,
                content: scored.document.content,
                score: scored.score,
                source: HitSource::Keyword,
            });
        }

        merged.truncate(top_k);
        Ok(merged)
    }
}

impl std::fmt::Debug for LocalSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearch").finish_non_exhaustive()
    }
}
