//! `sql_query` tool: guarded read-only queries against the relational store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{Tool, ToolDescriptor, ToolResult, string_param};
use crate::error::RagError;
use crate::store::SqlStore;

/// Keywords rejected anywhere in the query, as bare substrings.
///
/// This is a deliberately crude lexical filter, not a SQL parser: it is
/// fail-closed, so it also rejects harmless queries that merely contain
/// one of these words (e.g. a `created_at` column trips on `create`).
/// Statements that pass should still run under read-only credentials.
const BLOCKED_KEYWORDS: [&str; 7] = [
    "drop", "delete", "update", "insert", "alter", "create", "truncate",
];

/// Executes read-only SQL against the relational store.
pub struct SqlQueryTool {
    store: Arc<dyn SqlStore>,
}

#[derive(Deserialize)]
struct Args {
    query: String,
}

impl SqlQueryTool {
    /// Creates the tool over the given SQL store.
    #[must_use]
    pub fn new(store: Arc<dyn SqlStore>) -> Self {
        Self { store }
    }

    /// Checks the lexical guard. `Err` carries the rejection reason;
    /// rejected queries never reach the store.
    fn check_guard(query: &str) -> Result<(), String> {
        let lowered = query.trim().to_lowercase();

        if !lowered.starts_with("select") {
            return Err("Only SELECT queries are allowed".to_string());
        }

        for keyword in BLOCKED_KEYWORDS {
            if lowered.contains(keyword) {
                return Err(format!("Dangerous keyword detected: {keyword}"));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Tool for SqlQueryTool {
    fn descriptor(&self) -> ToolDescriptor {
        let mut parameters = BTreeMap::new();
        parameters.insert(
            "query".to_string(),
            string_param("The SQL SELECT query to execute", true),
        );
        ToolDescriptor {
            name: "sql_query".to_string(),
            description: "Execute read-only SQL queries on the database (SELECT only)"
                .to_string(),
            parameters,
        }
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, RagError> {
        let args: Args = serde_json::from_value(args).map_err(|e| RagError::ToolExecution {
            name: "sql_query".to_string(),
            message: format!("invalid arguments: {e}"),
        })?;

        if let Err(reason) = Self::check_guard(&args.query) {
            return Ok(ToolResult::failure(reason));
        }

        let rows = self.store.query(&args.query).await?;
        let results = rows.into_iter().map(Value::Object).collect();
        Ok(ToolResult::ok(results))
    }
}
