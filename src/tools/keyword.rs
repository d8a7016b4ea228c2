//! `keyword_search` tool: trigram matching against the document store.
//!
//! No embedding call is made; this is the cheap lexical path.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolDescriptor, ToolResult, integer_param, string_param};
use crate::error::RagError;
use crate::store::DocumentStore;

/// Default number of results.
const DEFAULT_TOP_K: usize = 10;
/// Upper bound on `top_k` from the model.
const MAX_TOP_K: usize = 50;

/// Searches documents by keyword/trigram similarity.
pub struct KeywordSearchTool {
    documents: Arc<dyn DocumentStore>,
}

#[derive(Deserialize)]
struct Args {
    query: String,
    top_k: Option<usize>,
}

impl KeywordSearchTool {
    /// Creates the tool over the given document store.
    #[must_use]
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl Tool for KeywordSearchTool {
    fn descriptor(&self) -> ToolDescriptor {
        let mut parameters = BTreeMap::new();
        parameters.insert("query".to_string(), string_param("The search query", true));
        parameters.insert(
            "top_k".to_string(),
            integer_param("Number of results to return", DEFAULT_TOP_K),
        );
        ToolDescriptor {
            name: "keyword_search".to_string(),
            description: "Search for documents using keyword matching and trigram similarity"
                .to_string(),
            parameters,
        }
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, RagError> {
        let args: Args = serde_json::from_value(args).map_err(|e| RagError::ToolExecution {
            name: "keyword_search".to_string(),
            message: format!("invalid arguments: {e}"),
        })?;
        let top_k = args.top_k.unwrap_or(DEFAULT_TOP_K).min(MAX_TOP_K);

        let scored = self.documents.keyword_search(&args.query, top_k).await?;

        let results = scored
            .into_iter()
            .map(|s| {
                json!({
                    "id": s.document.id,
                    "title": s.document.title,
                    "content": s.document.content,
                    "metadata": s.document.metadata,
                    "similarity": s.score,
                })
            })
            .collect();

        Ok(ToolResult::ok(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ScoredDocument;
    use crate::store::testing::{MockDocumentStore, doc};

    #[tokio::test]
    async fn test_returns_scored_documents() {
        let store = Arc::new(MockDocumentStore::default());
        store.set_keyword_results(vec![
            ScoredDocument {
                document: doc("1", "first", "alpha"),
                score: 0.8,
            },
            ScoredDocument {
                document: doc("2", "second", "beta"),
                score: 0.4,
            },
        ]);
        let tool = KeywordSearchTool::new(store);

        let result = tool
            .invoke(json!({"query": "alpha"}))
            .await
            .unwrap_or_else(|e| panic!("invoke failed: {e}"));
        assert!(result.success);
        assert_eq!(result.count, Some(2));
        assert_eq!(result.results[0]["id"], "1");
        assert!(result.results[0]["similarity"].as_f64().unwrap_or(0.0) > 0.5);
    }

    #[tokio::test]
    async fn test_empty_results_still_success() {
        let tool = KeywordSearchTool::new(Arc::new(MockDocumentStore::default()));
        let result = tool
            .invoke(json!({"query": "nothing"}))
            .await
            .unwrap_or_else(|e| panic!("invoke failed: {e}"));
        assert!(result.success);
        assert_eq!(result.count, Some(0));
        assert!(result.results.is_empty());
    }

    #[tokio::test]
    async fn test_missing_query_is_invalid() {
        let tool = KeywordSearchTool::new(Arc::new(MockDocumentStore::default()));
        let result = tool.invoke(json!({})).await;
        assert!(matches!(result, Err(RagError::ToolExecution { .. })));
    }
}
