//! Bounded plan/act/observe loop over the tool registry.

use serde_json::json;
use tracing::{debug, warn};

use super::output::{
    AgentOutput, AgentRunResult, AgentStep, Observation, sources_from_observations,
};
use super::prompt::{build_agent_system_prompt, render_observations};
use crate::llm::{ChatMessage, CompletionOptions, LlmClient, user_message};
use crate::tools::ToolRegistry;

/// Iterative agent: each round, one json-mode completion plans the next
/// action, then either a tool runs and its result is appended to the
/// observation log, or the loop terminates with the model's answer.
///
/// Every exit path yields a well-formed [`AgentRunResult`]; tool failures
/// are observations the model can react to, never run failures. Only a
/// failed planning call aborts the run, and even that is reported as a
/// result rather than an error.
pub struct AgentExecutor {
    client: LlmClient,
    registry: ToolRegistry,
    max_steps: usize,
}

impl AgentExecutor {
    /// Creates an executor over the given gateway and registry.
    #[must_use]
    pub fn new(client: LlmClient, registry: ToolRegistry, max_steps: usize) -> Self {
        Self {
            client,
            registry,
            max_steps,
        }
    }

    /// Runs the loop for one query.
    ///
    /// `history` is prior conversation context, threaded into every
    /// planning call before the current query.
    pub async fn run(&self, query: &str, history: &[ChatMessage]) -> AgentRunResult {
        let system_prompt = build_agent_system_prompt(&self.registry);
        let mut observations: Vec<Observation> = Vec::new();
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut step = 0usize;

        loop {
            step += 1;
            if step > self.max_steps {
                warn!(max_steps = self.max_steps, "agent exhausted its step budget");
                return AgentRunResult {
                    answer: format!(
                        "Maximum steps ({}) reached without final answer. \
                         Please try rephrasing your query.",
                        self.max_steps
                    ),
                    sources: Vec::new(),
                    steps_taken: steps,
                };
            }
            debug!(step, "agent planning round");

            let mut messages: Vec<ChatMessage> = history.to_vec();
            messages.push(user_message(query));
            if !observations.is_empty() {
                messages.push(user_message(&format!(
                    "Previous observations:\n{}\n\nWhat should we do next?",
                    render_observations(&observations)
                )));
            }

            let content = match self
                .client
                .complete(&system_prompt, &messages, CompletionOptions::json())
                .await
            {
                Ok(content) => content,
                Err(e) => {
                    warn!(error = %e, "agent planning call failed");
                    return AgentRunResult {
                        answer: format!("Error in agent planning: {e}"),
                        sources: Vec::new(),
                        steps_taken: steps,
                    };
                }
            };

            let output = AgentOutput::parse(&content);
            debug!(step, thought = %output.thought, tool = ?output.tool, "agent decision");
            steps.push(AgentStep {
                step,
                thought: output.thought.clone(),
                tool: output.tool.clone(),
                tool_input: output.tool_input.clone(),
                result: None,
            });

            if let Some(answer) = output.answer() {
                return AgentRunResult {
                    answer: answer.to_string(),
                    sources: sources_from_observations(&observations),
                    steps_taken: steps,
                };
            }

            if let Some(tool) = output.tool_name() {
                let input = output.tool_input.clone().unwrap_or_else(|| json!({}));
                let result = self.registry.call(tool, input.clone()).await;
                debug!(step, tool, success = result.success, "tool executed");
                observations.push(Observation {
                    tool: tool.to_string(),
                    input,
                    result: result.clone(),
                });
                if let Some(last) = steps.last_mut() {
                    last.result = Some(result);
                }
                continue;
            }

            // Neither a tool nor an answer: nothing left to act on.
            return AgentRunResult {
                answer: "Agent did not provide a final answer or tool to execute.".to_string(),
                sources: Vec::new(),
                steps_taken: steps,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::config::RagConfig;
    use crate::error::RagError;
    use crate::llm::testing::MockProvider;
    use crate::tools::{Tool, ToolDescriptor, ToolResult};

    struct LookupTool;

    #[async_trait]
    impl Tool for LookupTool {
        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                name: "lookup".to_string(),
                description: "Looks up documents".to_string(),
                parameters: BTreeMap::new(),
            }
        }

        async fn invoke(&self, _args: Value) -> Result<ToolResult, RagError> {
            Ok(ToolResult::ok(vec![json!({
                "id": "1",
                "title": "doc",
                "content": "llamas are camelids",
            })]))
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
                message: "backend down".to_string(),
            })
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(LookupTool));
        registry.register(Box::new(BrokenTool));
        registry
    }

    fn executor(provider: Arc<MockProvider>, max_steps: usize) -> AgentExecutor {
        let config = RagConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!());
        AgentExecutor::new(
            LlmClient::with_provider(provider, &config),
            registry(),
            max_steps,
        )
    }

    fn plan_tool(tool: &str) -> String {
        format!(r#"{{"thought": "use a tool", "tool": "{tool}", "tool_input": {{"query": "q"}}}}"#)
    }

    const PLAN_ANSWER: &str = r#"{"thought": "done", "tool": null, "final_answer": "Llamas are camelids."}"#;

    #[tokio::test]
    async fn test_tool_then_answer_with_sources() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            plan_tool("lookup"),
            PLAN_ANSWER.to_string(),
        ]));
        let result = executor(Arc::clone(&provider), 5).run("what are llamas", &[]).await;

        assert_eq!(result.answer, "Llamas are camelids.");
        assert_eq!(result.steps_taken.len(), 2);
        assert_eq!(result.steps_taken[0].tool.as_deref(), Some("lookup"));
        assert!(
            result.steps_taken[0]
                .result
                .as_ref()
                .is_some_and(|r| r.success)
        );
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].id.as_deref(), Some("1"));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_observations_threaded_into_next_round() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            plan_tool("lookup"),
            PLAN_ANSWER.to_string(),
        ]));
        executor(Arc::clone(&provider), 5).run("q", &[]).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        // Round one: system + query only.
        assert_eq!(requests[0].messages.len(), 2);
        // Round two carries the rendered observation.
        let follow_up = &requests[1].messages[2].content;
        assert!(follow_up.starts_with("Previous observations:"));
        assert!(follow_up.contains("Observation 1 (from lookup):"));
        assert!(follow_up.contains("llamas are camelids"));
        assert!(requests[1].json_mode);
    }

    #[tokio::test]
    async fn test_tool_failure_is_observed_and_loop_continues() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            plan_tool("broken"),
            PLAN_ANSWER.to_string(),
        ]));
        let result = executor(provider, 5).run("q", &[]).await;

        assert_eq!(result.answer, "Llamas are camelids.");
        assert_eq!(result.steps_taken.len(), 2);
        let tool_result = result.steps_taken[0]
            .result
            .as_ref()
            .unwrap_or_else(|| unreachable!());
        assert!(!tool_result.success);
        assert!(
            tool_result
                .error
                .as_deref()
                .unwrap_or_default()
                .contains("backend down")
        );
    }

    #[tokio::test]
    async fn test_step_budget_exhaustion() {
        // The model always asks for another lookup; the script's last
        // entry repeats.
        let provider = Arc::new(MockProvider::with_responses(vec![plan_tool("lookup")]));
        let result = executor(Arc::clone(&provider), 3).run("q", &[]).await;

        assert!(result.answer.contains("Maximum steps (3) reached"));
        assert_eq!(result.steps_taken.len(), 3);
        assert_eq!(provider.call_count(), 3);
        // Only the final-answer terminal derives sources; the exhaustion
        // terminal returns none, even with observations gathered.
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_neither_tool_nor_answer_terminates() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            r#"{"thought": "unsure"}"#.to_string(),
        ]));
        let result = executor(Arc::clone(&provider), 5).run("q", &[]).await;

        assert_eq!(
            result.answer,
            "Agent did not provide a final answer or tool to execute."
        );
        assert_eq!(result.steps_taken.len(), 1);
        assert_eq!(provider.call_count(), 1);
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_no_answer_after_tool_yields_no_sources() {
        // A lookup ran, so an observation with document content exists,
        // but the run ends without a final answer.
        let provider = Arc::new(MockProvider::with_responses(vec![
            plan_tool("lookup"),
            r#"{"thought": "unsure"}"#.to_string(),
        ]));
        let result = executor(provider, 5).run("q", &[]).await;

        assert_eq!(
            result.answer,
            "Agent did not provide a final answer or tool to execute."
        );
        assert_eq!(result.steps_taken.len(), 2);
        assert!(
            result.steps_taken[0]
                .result
                .as_ref()
                .is_some_and(|r| r.success)
        );
        assert!(result.sources.is_empty());
    }

    #[tokio::test]
    async fn test_planning_failure_reported_as_result() {
        let provider = Arc::new(MockProvider::failing("rate limited"));
        let result = executor(provider, 5).run("q", &[]).await;

        assert!(result.answer.starts_with("Error in agent planning:"));
        assert!(result.answer.contains("rate limited"));
        assert!(result.sources.is_empty());
        assert!(result.steps_taken.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_plan_degrades_to_answer() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            "total garbage".to_string(),
        ]));
        let result = executor(provider, 5).run("q", &[]).await;

        assert!(result.answer.contains("Could not parse LLM response"));
        assert!(result.answer.contains("total garbage"));
        assert_eq!(result.steps_taken.len(), 1);
    }

    #[tokio::test]
    async fn test_history_precedes_query() {
        let provider = Arc::new(MockProvider::with_responses(vec![PLAN_ANSWER.to_string()]));
        let history = vec![
            user_message("earlier question"),
            crate::llm::assistant_message("earlier answer"),
        ];
        executor(Arc::clone(&provider), 5).run("follow-up", &history).await;

        let requests = provider.requests();
        // system + history pair + query
        assert_eq!(requests[0].messages.len(), 4);
        assert_eq!(requests[0].messages[1].content, "earlier question");
        assert_eq!(requests[0].messages[3].content, "follow-up");
    }

    #[tokio::test]
    async fn test_system_prompt_lists_tools_in_order() {
        let provider = Arc::new(MockProvider::with_responses(vec![PLAN_ANSWER.to_string()]));
        executor(Arc::clone(&provider), 5).run("q", &[]).await;

        let system = provider.requests()[0].messages[0].content.clone();
        let lookup_at = system.find("- lookup: Looks up documents");
        let broken_at = system.find("- broken: Always fails");
        assert!(lookup_at.is_some());
        assert!(broken_at.is_some());
        assert!(lookup_at < broken_at);
    }

    #[tokio::test]
    async fn test_missing_tool_input_defaults_to_empty_object() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            r#"{"thought": "go", "tool": "lookup"}"#.to_string(),
            PLAN_ANSWER.to_string(),
        ]));
        let result = executor(provider, 5).run("q", &[]).await;

        assert_eq!(result.answer, "Llamas are camelids.");
        assert_eq!(result.steps_taken[0].tool.as_deref(), Some("lookup"));
    }
}
