//! Single-pass pipeline: route, retrieve, build context, answer.
//!
//! The deterministic alternative to the iterative agent: exactly one
//! routing call, at most one retrieval per selected path, one synthesis
//! call. Retrieval failures degrade to missing context; only the final
//! synthesis call can fail the run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::RagError;
use crate::llm::{CompletionOptions, LlmClient, user_message};
use crate::router::{RouteDecision, Router};
use crate::search::LocalSearch;
use crate::web::WebSearchApi;

/// Web hits folded into the synthesis context.
const WEB_CONTEXT_HITS: usize = 3;

/// System prompt for the synthesis call.
const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a helpful assistant. \
     Answer the user's query using the provided context. \
     If the context does not contain the answer, say so.";

/// One recorded pipeline stage, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    /// Stage tag: `routing`, `retrieval_local`, `retrieval_web`, or
    /// `context_building`.
    pub step: String,
    /// Stage-specific detail for inspection.
    pub detail: Value,
}

/// The pipeline's terminal output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Synthesized answer text.
    pub answer: String,
    /// Stage log in execution order.
    pub steps: Vec<PipelineStep>,
    /// The routing decision that drove retrieval.
    pub source: RouteDecision,
}

/// Route/retrieve/synthesize pipeline.
pub struct Pipeline {
    router: Router,
    client: LlmClient,
    local: LocalSearch,
    web: Arc<dyn WebSearchApi>,
}

impl Pipeline {
    /// Creates a pipeline from its four collaborators.
    #[must_use]
    pub fn new(
        router: Router,
        client: LlmClient,
        local: LocalSearch,
        web: Arc<dyn WebSearchApi>,
    ) -> Self {
        Self {
            router,
            client,
            local,
            web,
        }
    }

    /// Runs the pipeline for one query.
    ///
    /// `summary` describes the local corpus for the routing call.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Completion`] if the synthesis call fails.
    /// Routing and retrieval failures degrade instead of erroring.
    pub async fn run(
        &self,
        query: &str,
        summary: Option<&str>,
    ) -> Result<PipelineResult, RagError> {
        let mut steps = Vec::new();
        let mut snippets: Vec<String> = Vec::new();

        let decision = self.router.route(query, summary).await;
        steps.push(PipelineStep {
            step: "routing".to_string(),
            detail: json!({"decision": decision.to_string()}),
        });

        if decision.includes_local() {
            match self.local.search(query, LocalSearch::DEFAULT_TOP_K).await {
                Ok(hits) => {
                    steps.push(PipelineStep {
                        step: "retrieval_local".to_string(),
                        detail: json!({"hits": hits.len()}),
                    });
                    snippets.extend(
                        hits.into_iter()
                            .map(|hit| format!("[Local] {}: {}", hit.title, hit.content)),
                    );
                }
                Err(e) => {
                    warn!(error = %e, "local retrieval failed, continuing without it");
                    steps.push(PipelineStep {
                        step: "retrieval_local".to_string(),
                        detail: json!({"hits": 0, "error": e.to_string()}),
                    });
                }
            }
        }

        if decision.includes_web() {
            match self.web.search(query).await {
                Ok(response) => {
                    let hits: Vec<_> =
                        response.organic.into_iter().take(WEB_CONTEXT_HITS).collect();
                    steps.push(PipelineStep {
                        step: "retrieval_web".to_string(),
                        detail: json!({"hits": hits.len()}),
                    });
                    snippets.extend(
                        hits.into_iter()
                            .map(|hit| format!("[Web] {}: {}", hit.title, hit.snippet)),
                    );
                }
                Err(e) => {
                    warn!(error = %e, "web retrieval failed, continuing without it");
                    steps.push(PipelineStep {
                        step: "retrieval_web".to_string(),
                        detail: json!({"hits": 0, "error": e.to_string()}),
                    });
                }
            }
        }

        let context = if snippets.is_empty() {
            "No relevant context found.".to_string()
        } else {
            snippets.join("\n\n")
        };
        steps.push(PipelineStep {
            step: "context_building".to_string(),
            detail: json!({"chars": context.len(), "snippets": snippets.len()}),
        });
        debug!(%decision, snippets = snippets.len(), "synthesizing answer");

        let answer = self
            .client
            .complete(
                SYNTHESIS_SYSTEM_PROMPT,
                &[user_message(&format!("Context:\n{context}\n\nQuery: {query}"))],
                CompletionOptions::default(),
            )
            .await?;

        Ok(PipelineResult {
            answer,
            steps,
            source: decision,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}
