//! `vector_search` tool: semantic similarity over the vector store.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolDescriptor, ToolResult, integer_param, string_param};
use crate::embedding::EmbeddingClient;
use crate::error::RagError;
use crate::store::{DocumentStore, VectorStore};

/// Default number of results.
const DEFAULT_TOP_K: usize = 5;
/// Upper bound on `top_k` from the model.
const MAX_TOP_K: usize = 50;

/// Searches documents by embedding the query and querying the vector store.
///
/// Hits are resolved against the document store; a hit whose document is
/// gone falls back to whatever title/content its payload carries, so stale
/// vector entries degrade instead of failing the call.
pub struct VectorSearchTool {
    embedding: EmbeddingClient,
    vectors: Arc<dyn VectorStore>,
    documents: Arc<dyn DocumentStore>,
}

#[derive(Deserialize)]
struct Args {
    query: String,
    top_k: Option<usize>,
    filters: Option<Value>,
}

impl VectorSearchTool {
    /// Creates the tool over the given gateway and stores.
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
}

#[async_trait]
impl Tool for VectorSearchTool {
    fn descriptor(&self) -> ToolDescriptor {
        let mut parameters = BTreeMap::new();
        parameters.insert("query".to_string(), string_param("The search query", true));
        parameters.insert(
            "top_k".to_string(),
            integer_param("Number of results to return", DEFAULT_TOP_K),
        );
        parameters.insert(
            "filters".to_string(),
            super::ParamSpec {
                type_name: "object".to_string(),
                description: "Optional metadata filters".to_string(),
                required: false,
                default: None,
            },
        );
        ToolDescriptor {
            name: "vector_search".to_string(),
            description: "Search for documents using semantic vector similarity".to_string(),
            parameters,
        }
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, RagError> {
        let args: Args = serde_json::from_value(args).map_err(|e| RagError::ToolExecution {
            name: "vector_search".to_string(),
            message: format!("invalid arguments: {e}"),
        })?;
        let top_k = args.top_k.unwrap_or(DEFAULT_TOP_K).min(MAX_TOP_K);

        let query_vector = self.embedding.embed(&args.query).await?;
        let hits = self
            .vectors
            .search(&query_vector, top_k, args.filters.as_ref())
            .await?;

        let mut results = Vec::with_capacity(hits.len());
        let mut seen: HashSet<String> = HashSet::new();
        for hit in hits {
            if !seen.insert(hit.id.clone()) {
                continue;
            }
            let item = match self.documents.get(&hit.id).await? {
                Some(doc) => json!({
                    "id": doc.id,
                    "title": doc.title,
                    "content": doc.content,
                    "metadata": doc.metadata,
                    "score": hit.score,
                }),
                None => json!({
                    "id": hit.id,
                    "title": hit.payload.get("title").cloned().unwrap_or_else(|| json!("Unknown")),
                    "content": hit.payload.get("content").cloned().unwrap_or_else(|| json!("")),
                    "metadata": hit.payload,
                    "score": hit.score,
                }),
            };
            results.push(item);
        }

        Ok(ToolResult::ok(results))
    }
}
