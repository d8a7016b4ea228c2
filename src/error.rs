//! Error types for the orchestrator core.
//!
//! One taxonomy covers every layer: construction-time configuration
//! failures, per-call validation, upstream provider failures, and the
//! recoverable tool/parse failures that the control loop folds back into
//! observations rather than propagating.

use thiserror::Error;

/// Errors produced by the RAG orchestrator.
#[derive(Debug, Error)]
pub enum RagError {
    /// No API key was configured for the selected provider.
    #[error("API key missing: set OPENAI_API_KEY, GROQ_API_KEY, or RAGENT_API_KEY")]
    ApiKeyMissing,

    /// The configured provider name is not supported.
    #[error("Unsupported provider: {name}")]
    UnsupportedProvider {
        /// The provider name that was requested.
        name: String,
    },

    /// The selected provider does not support the requested operation.
    #[error("Provider '{provider}' does not support {operation}")]
    UnsupportedOperation {
        /// Provider name.
        provider: String,
        /// The unsupported operation (e.g. "embeddings").
        operation: String,
    },

    /// Invalid input to a gateway call (e.g. empty embedding text).
    #[error("Validation error: {message}")]
    Validation {
        /// What was invalid.
        message: String,
    },

    /// An LLM completion call failed upstream.
    #[error("Completion failed: {message}")]
    Completion {
        /// Upstream error message.
        message: String,
    },

    /// An embedding call failed upstream.
    #[error("Embedding failed: {message}")]
    Embedding {
        /// Upstream error message.
        message: String,
    },

    /// A web search API call failed.
    #[error("Web search failed: {message}")]
    WebSearch {
        /// Upstream error message.
        message: String,
    },

    /// A document, vector, or relational store call failed.
    #[error("Store error: {message}")]
    Store {
        /// Upstream error message.
        message: String,
    },

    /// A tool invocation failed. Normalized to a failure-valued
    /// [`ToolResult`](crate::tools::ToolResult) inside the registry,
    /// never propagated raw to the control loop.
    #[error("Tool '{name}' failed: {message}")]
    ToolExecution {
        /// Name of the failing tool.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The LLM returned a response that could not be parsed as expected.
    #[error("Failed to parse LLM response: {message}")]
    ResponseParse {
        /// Parse failure description.
        message: String,
        /// The raw response content, for diagnostics.
        content: String,
    },
}
