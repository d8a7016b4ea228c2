//! Query routing: local corpus, web, or both.
//!
//! One json-mode completion classifies the query. The fallback is the
//! load-bearing part of the contract: on any failure — call error,
//! non-JSON body, missing or invalid `source` field — the router returns
//! [`RouteDecision::Web`], because web search has the broadest coverage.
//! Failing open beats failing the whole request over a classification.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RagConfig;
use crate::json::extract_json_object;
use crate::llm::{CompletionOptions, LlmClient, user_message};

/// Where to retrieve from for a given query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteDecision {
    /// The local document corpus only.
    Local,
    /// Web search only.
    Web,
    /// Both local corpus and web search.
    Both,
}

impl RouteDecision {
    /// The fail-open default applied whenever routing cannot produce a
    /// trustworthy classification.
    pub const FALLBACK: Self = Self::Web;

    /// Whether local retrieval should run.
    #[must_use]
    pub const fn includes_local(self) -> bool {
        matches!(self, Self::Local | Self::Both)
    }

    /// Whether web retrieval should run.
    #[must_use]
    pub const fn includes_web(self) -> bool {
        matches!(self, Self::Web | Self::Both)
    }

    fn parse(source: &str) -> Option<Self> {
        match source {
            "local" => Some(Self::Local),
            "web" => Some(Self::Web),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

impl std::fmt::Display for RouteDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Local => "local",
            Self::Web => "web",
            Self::Both => "both",
        };
        f.write_str(s)
    }
}

/// System prompt for the routing call.
const ROUTER_SYSTEM_PROMPT: &str = r#"You are a router for a RAG system.
Your job is to decide where to look for information to answer the user's query.

Available sources:
1. "local": Use this if the query relates to the provided summary of the local documents.
2. "web": Use this if the query requires up-to-date information, news, or general knowledge not covered by the local documents.
3. "both": Use this if the query might need both local context and external information.

Output JSON format: {"source": "local" | "web" | "both"}"#;

/// Single-shot query router.
#[derive(Debug, Clone)]
pub struct Router {
    client: LlmClient,
}

impl Router {
    /// Creates a router over the given LLM gateway, retargeted to the
    /// configured routing model (a cheaper model than the chat model,
    /// unless overridden they are the same).
    #[must_use]
    pub fn new(client: LlmClient, config: &RagConfig) -> Self {
        Self {
            client: client.with_model(config.router_model.clone()),
        }
    }

    /// Classifies a query, optionally using a local-corpus summary as
    /// context. Infallible by policy: every failure path falls open to
    /// [`RouteDecision::FALLBACK`].
    pub async fn route(&self, query: &str, summary: Option<&str>) -> RouteDecision {
        let mut user_content = format!("Query: {query}\n");
        if let Some(summary) = summary {
            user_content.push_str(&format!("Local Document Summary: {summary}\n"));
        }

        let response = self
            .client
            .complete(
                ROUTER_SYSTEM_PROMPT,
                &[user_message(&user_content)],
                CompletionOptions::json(),
            )
            .await;

        let content = match response {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "routing call failed, falling open to web");
                return RouteDecision::FALLBACK;
            }
        };

        let decision = extract_json_object(&content)
            .ok()
            .and_then(|value| {
                value
                    .get("source")
                    .and_then(|s| s.as_str())
                    .and_then(RouteDecision::parse)
            })
            .unwrap_or_else(|| {
                warn!(%content, "unusable routing response, falling open to web");
                RouteDecision::FALLBACK
            });

        debug!(%decision, "routed query");
        decision
    }
}
