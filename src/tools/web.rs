//! `web_search` tool: live web results via the search API boundary.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolDescriptor, ToolResult, string_param};
use crate::error::RagError;
use crate::web::WebSearchApi;

/// Organic hits kept per query.
const MAX_HITS: usize = 5;

/// Searches the web and maps organic hits into result items.
pub struct WebSearchTool {
    api: Arc<dyn WebSearchApi>,
}

#[derive(Deserialize)]
struct Args {
    query: String,
}

impl WebSearchTool {
    /// Creates the tool over the given search API.
    #[must_use]
    pub fn new(api: Arc<dyn WebSearchApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn descriptor(&self) -> ToolDescriptor {
        let mut parameters = BTreeMap::new();
        parameters.insert("query".to_string(), string_param("The search query", true));
        ToolDescriptor {
            name: "web_search".to_string(),
            description: "Search the web for up-to-date information".to_string(),
            parameters,
        }
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, RagError> {
        let args: Args = serde_json::from_value(args).map_err(|e| RagError::ToolExecution {
            name: "web_search".to_string(),
            message: format!("invalid arguments: {e}"),
        })?;

        let response = self.api.search(&args.query).await?;

        let results = response
            .organic
            .into_iter()
            .take(MAX_HITS)
            .map(|hit| {
                json!({
                    "title": hit.title,
                    "content": hit.snippet,
                    "url": hit.link,
                })
            })
            .collect();

        Ok(ToolResult::ok(results))
    }
}
