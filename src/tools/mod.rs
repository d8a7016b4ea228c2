//! Tool registry and the four retrieval adapters.
//!
//! Tools are named, schema-described functions the agent may invoke.
//! Every invocation yields exactly one [`ToolResult`]: failure is a
//! terminal, inspectable value, never an error that escapes the registry.

pub mod keyword;
pub mod sql;
pub mod vector;
pub mod web;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::embedding::EmbeddingClient;
use crate::error::RagError;
use crate::store::{DocumentStore, SqlStore, VectorStore};
use crate::web::WebSearchApi;

pub use keyword::KeywordSearchTool;
pub use sql::SqlQueryTool;
pub use vector::VectorSearchTool;
pub use web::WebSearchTool;

/// Schema for one tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// JSON type name (`"string"`, `"integer"`, `"object"`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Human-readable parameter description.
    pub description: String,
    /// Whether the parameter must be provided.
    pub required: bool,
    /// Default value for optional parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Machine-readable tool metadata, constructed once at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name, unique within a registry.
    pub name: String,
    /// What the tool does, shown to the planning model.
    pub description: String,
    /// Parameter schemas by name.
    pub parameters: BTreeMap<String, ParamSpec>,
}

/// The uniform envelope every tool invocation produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Result items, possibly empty.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of result items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Registered tool names, included only on unknown-tool failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_tools: Option<Vec<String>>,
}

impl ToolResult {
    /// Successful result with items.
    #[must_use]
    pub fn ok(results: Vec<Value>) -> Self {
        let count = results.len();
        Self {
            success: true,
            results,
            error: None,
            count: Some(count),
            available_tools: None,
        }
    }

    /// Failed result with an error message.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            error: Some(error.into()),
            count: None,
            available_tools: None,
        }
    }
}

/// A named, schema-described function the agent may invoke.
///
/// Implementations deserialize their own typed argument struct from the
/// JSON `args` value; loosely-typed data stays at this boundary only.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Builds the tool's descriptor. Called once at registration.
    fn descriptor(&self) -> ToolDescriptor;

    /// Invokes the tool with JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ToolExecution`] on bad arguments or backend
    /// failure; the registry converts either into a failure-valued
    /// [`ToolResult`].
    async fn invoke(&self, args: Value) -> Result<ToolResult, RagError>;
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    tool: Box<dyn Tool>,
}

/// Registry holding the available tools in registration order.
///
/// Registration order is stable and drives prompt construction, so the
/// planning model always sees a deterministic tool list.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<RegisteredTool>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard four-tool registry: `vector_search`,
    /// `keyword_search`, `sql_query`, `web_search`.
    #[must_use]
    pub fn with_standard_tools(
        embedding: EmbeddingClient,
        vectors: Arc<dyn VectorStore>,
        documents: Arc<dyn DocumentStore>,
        sql: Arc<dyn SqlStore>,
        web: Arc<dyn WebSearchApi>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(VectorSearchTool::new(
            embedding,
            vectors,
            Arc::clone(&documents),
        )));
        registry.register(Box::new(KeywordSearchTool::new(documents)));
        registry.register(Box::new(SqlQueryTool::new(sql)));
        registry.register(Box::new(WebSearchTool::new(web)));
        registry
    }

    /// Registers a tool, capturing its descriptor.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let descriptor = tool.descriptor();
        self.entries.push(RegisteredTool { descriptor, tool });
    }

    /// Registered tool names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.descriptor.name.clone())
            .collect()
    }

    /// Descriptors in registration order.
    #[must_use]
    pub fn descriptions(&self) -> Vec<&ToolDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Invokes a tool by name, normalizing every failure into the envelope.
    ///
    /// Unknown names produce `{success: false, error: "Unknown tool: ..."}`
    /// with the available tool list attached; tool errors produce
    /// `{success: false, error: "Tool execution failed: ..."}`. Neither
    /// path raises.
    pub async fn call(&self, name: &str, args: Value) -> ToolResult {
        let Some(entry) = self.entries.iter().find(|e| e.descriptor.name == name) else {
            return ToolResult {
                available_tools: Some(self.names()),
                ..ToolResult::failure(format!("Unknown tool: {name}"))
            };
        };

        match entry.tool.invoke(args).await {
            Ok(result) => result,
            Err(e) => {
                debug!(tool = name, error = %e, "tool execution failed");
                ToolResult::failure(format!("Tool execution failed: {e}"))
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

/// Builds a string `ParamSpec`.
pub(crate) fn string_param(description: &str, required: bool) -> ParamSpec {
    ParamSpec {
        type_name: "string".to_string(),
        description: description.to_string(),
        required,
        default: None,
    }
}

/// Builds an integer `ParamSpec` with a default.
pub(crate) fn integer_param(description: &str, default: usize) -> ParamSpec {
    ParamSpec {
        type_name: "integer".to_string(),
        description: description.to_string(),
        required: false,
        default: Some(Value::from(default)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: "echo".to_string(),
                description: "Echoes its arguments".to_string(),
                parameters: BTreeMap::new(),
            }
        }

        async fn invoke(&self, args: Value) -> Result<ToolResult, RagError> {
            Ok(ToolResult::ok(vec![args]))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: "broken".to_string(),
                description: "Always fails".to_string(),
                parameters: BTreeMap::new(),
            }
        }

        async fn invoke(&self, _args: Value) -> Result<ToolResult, RagError> {
            Err(RagError::ToolExecution {
                name: "broken".to_string(),
                message: "backend exploded".to_string(),
            })
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        registry.register(Box::new(BrokenTool));
        registry
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_failure_value() {
        let registry = registry();
        let result = registry.call("nope", json!({})).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown tool: nope"));
        assert_eq!(
            result.available_tools,
            Some(vec!["echo".to_string(), "broken".to_string()])
        );
    }

    #[tokio::test]
    async fn test_tool_error_normalized() {
        let registry = registry();
        let result = registry.call("broken", json!({})).await;
        assert!(!result.success);
        let error = result.error.unwrap_or_default();
        assert!(error.contains("Tool execution failed"));
        assert!(error.contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_successful_call() {
        let registry = registry();
        let result = registry.call("echo", json!({"k": "v"})).await;
        assert!(result.success);
        assert_eq!(result.count, Some(1));
        assert_eq!(result.results[0]["k"], "v");
    }

    #[test]
    fn test_names_in_registration_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["echo", "broken"]);
        let descriptors = registry.descriptions();
        assert_eq!(descriptors[0].name, "echo");
        assert_eq!(descriptors[1].name, "broken");
    }

    #[test]
    fn test_tool_result_serialization_omits_empty_fields() {
        let result = ToolResult::ok(vec![json!(1)]);
        let encoded = serde_json::to_string(&result).unwrap_or_default();
        assert!(!encoded.contains("error"));
        assert!(!encoded.contains("available_tools"));
        assert!(encoded.contains("\"count\":1"));
    }
}
