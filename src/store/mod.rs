//! Store boundaries: document, vector, and relational stores.
//!
//! These are external collaborators. The core owns only the trait
//! contracts; persistence, schema, and ingestion live elsewhere.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RagError;

/// A stored document: text plus free-form metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable document id.
    pub id: String,
    /// Document title.
    pub title: String,
    /// Full document text.
    pub content: String,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: Value,
}

/// A document with its keyword-search similarity score.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Trigram similarity score, descending within one result list.
    pub score: f32,
}

/// A vector-store hit: id, similarity score, and the stored payload.
#[derive(Debug, Clone)]
pub struct VectorHit {
    /// Id of the matched point (a document or chunk id).
    pub id: String,
    /// Similarity score, descending within one result list.
    pub score: f32,
    /// Payload stored alongside the vector.
    pub payload: Value,
}

/// A point to upsert into the vector store.
#[derive(Debug, Clone)]
pub struct VectorPoint {
    /// Point id.
    pub id: String,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Payload to store alongside the vector.
    pub payload: Value,
}

/// Document store boundary.
///
/// `keyword_search` is expected to return results ordered by descending
/// similarity, already threshold-filtered by the implementation (the
/// reference store uses trigram similarity with a 0.1 cutoff).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by id. `Ok(None)` when absent.
    async fn get(&self, id: &str) -> Result<Option<Document>, RagError>;

    /// Creates a document.
    async fn create(&self, document: Document) -> Result<(), RagError>;

    /// Updates a document by id.
    async fn update(&self, document: Document) -> Result<(), RagError>;

    /// Deletes a document by id.
    async fn delete(&self, id: &str) -> Result<(), RagError>;

    /// Trigram/keyword search, best matches first.
    async fn keyword_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredDocument>, RagError>;
}

/// Vector similarity store boundary.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Upserts a single point.
    async fn upsert(&self, point: VectorPoint) -> Result<(), RagError>;

    /// Upserts a batch of points.
    async fn upsert_batch(&self, points: Vec<VectorPoint>) -> Result<(), RagError>;

    /// Top-k nearest neighbors for `vector`, best matches first.
    async fn search(
        &self,
        vector: &[f32],
        top_k: usize,
        filters: Option<&Value>,
    ) -> Result<Vec<VectorHit>, RagError>;

    /// Deletes a point by id.
    async fn delete(&self, id: &str) -> Result<(), RagError>;
}

/// Read-only relational query boundary.
///
/// The caller (the `sql_query` tool) guards against writes before a
/// statement ever reaches this trait; implementations should still run
/// with read-only credentials.
#[async_trait]
pub trait SqlStore: Send + Sync {
    /// Executes a query, returning rows as column→value maps.
    async fn query(&self, sql: &str) -> Result<Vec<serde_json::Map<String, Value>>, RagError>;
}
