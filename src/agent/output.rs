//! Data types for one executor run: parsed model output, the step log,
//! observations, and the final result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::json::parse_lenient;
use crate::tools::ToolResult;

/// Maximum characters of source content kept for citation display.
const SOURCE_CONTENT_CHARS: usize = 200;

/// The planning model's output for one iteration, parsed from JSON.
///
/// Exactly one of `tool` or `final_answer` is expected to be meaningful;
/// the executor resolves ambiguity (final answer wins, neither terminates
/// cleanly).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentOutput {
    /// The model's reasoning for this step.
    #[serde(default)]
    pub thought: String,
    /// Tool to invoke next, if any.
    #[serde(default)]
    pub tool: Option<String>,
    /// Arguments for the tool.
    #[serde(default)]
    pub tool_input: Option<Value>,
    /// Final answer, if the model is done.
    #[serde(default)]
    pub final_answer: Option<String>,
}

impl AgentOutput {
    /// Parses model output leniently.
    ///
    /// Direct JSON parse first, then best-effort extraction of the object
    /// between the first `{` and the last `}`. If nothing parses, returns
    /// a degraded output whose `final_answer` reports the failure and
    /// carries the raw text, so the loop terminates with something
    /// inspectable instead of an error.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        parse_lenient::<Self>(content).unwrap_or_else(|_| Self {
            thought: "Failed to parse response".to_string(),
            tool: None,
            tool_input: None,
            final_answer: Some(format!("Error: Could not parse LLM response: {content}")),
        })
    }

    /// The tool name, if present and non-empty.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_deref().filter(|t| !t.is_empty())
    }

    /// The final answer, if present and non-empty.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.final_answer.as_deref().filter(|a| !a.is_empty())
    }
}

/// One recorded tool invocation. Append-only within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Tool that was invoked.
    pub tool: String,
    /// Arguments it was invoked with.
    pub input: Value,
    /// The invocation's result, success or failure.
    pub result: ToolResult,
}

/// One loop iteration in the step log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStep {
    /// 1-based iteration number.
    pub step: usize,
    /// The model's reasoning.
    pub thought: String,
    /// Tool chosen, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// Tool arguments, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<Value>,
    /// Tool result, attached after execution within the same iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolResult>,
}

/// A cited source derived from observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Document id, when the result item carried one.
    #[serde(default)]
    pub id: Option<String>,
    /// Title, when present.
    #[serde(default)]
    pub title: Option<String>,
    /// Content excerpt, truncated for display.
    pub content: String,
}

/// The executor's terminal output. Well-formed on every exit path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunResult {
    /// Final answer text.
    pub answer: String,
    /// Sources cited from observations (empty on failure paths).
    pub sources: Vec<Source>,
    /// Full step log, one entry per loop iteration.
    pub steps_taken: Vec<AgentStep>,
}

/// Derives cited sources by scanning all observations for result items
/// that look like documents (objects exposing a string `content`).
#[must_use]
pub fn sources_from_observations(observations: &[Observation]) -> Vec<Source> {
    let mut sources = Vec::new();
    for obs in observations {
        for item in &obs.result.results {
            let Some(object) = item.as_object() else {
                continue;
            };
            let Some(content) = object.get("content").and_then(Value::as_str) else {
                continue;
            };
            let excerpt: String = content.chars().take(SOURCE_CONTENT_CHARS).collect();
            sources.push(Source {
                id: object.get("id").map(value_to_id),
                title: object
                    .get("title")
                    .and_then(Value::as_str)
                    .map(String::from),
                content: format!("{excerpt}..."),
            });
        }
    }
    sources
}

fn value_to_id(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), String::from)
}
