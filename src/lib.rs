//! Agentic retrieval-augmented generation over pluggable stores.
//!
//! Combines a provider-agnostic LLM gateway, an embedding gateway, four
//! retrieval tools behind a registry, and two orchestration styles: an
//! iterative agent and a single-pass routed pipeline.
//!
//! # Architecture
//!
//! ```text
//! User query
//!   ├── AgentExecutor (plan → act → observe, bounded)
//!   │     └── ToolRegistry
//!   │           ├── vector_search   (embedding + vector store)
//!   │           ├── keyword_search  (document store)
//!   │           ├── sql_query       (read-only SQL)
//!   │           └── web_search      (Serper)
//!   └── Pipeline (route once → retrieve → synthesize)
//!         ├── Router (local | web | both, fails open to web)
//!         ├── LocalSearch (vector-priority hybrid merge)
//!         └── Web search
//! ```
//!
//! Storage and web access sit behind traits ([`store::DocumentStore`],
//! [`store::VectorStore`], [`store::SqlStore`], [`web::WebSearchApi`]);
//! the crate ships the LLM-facing half and leaves the backends to the
//! embedding application.

pub mod agent;
pub mod config;
pub mod embedding;
pub mod error;
pub mod json;
pub mod llm;
pub mod pipeline;
pub mod router;
pub mod search;
pub mod store;
pub mod tools;
pub mod web;

pub use agent::{AgentExecutor, AgentRunResult};
pub use config::{RagConfig, RagConfigBuilder};
pub use embedding::EmbeddingClient;
pub use error::RagError;
pub use llm::{LlmClient, create_provider};
pub use pipeline::{Pipeline, PipelineResult};
pub use router::{RouteDecision, Router};
pub use search::LocalSearch;
pub use tools::{ToolRegistry, ToolResult};
