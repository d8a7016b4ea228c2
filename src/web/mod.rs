//! Web search boundary and the Serper-backed implementation.

pub mod serper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

pub use serper::SerperClient;

/// One organic web search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganicHit {
    /// Result title.
    #[serde(default)]
    pub title: String,
    /// Result snippet text.
    #[serde(default)]
    pub snippet: String,
    /// Result URL.
    #[serde(default)]
    pub link: String,
}

/// Response from a web search call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSearchResponse {
    /// Ranked organic hits, best first.
    #[serde(default)]
    pub organic: Vec<OrganicHit>,
}

/// Web search API boundary.
#[async_trait]
pub trait WebSearchApi: Send + Sync {
    /// Searches the web for `query`, returning ranked organic hits.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::WebSearch`] on transport or API failure.
    async fn search(&self, query: &str) -> Result<WebSearchResponse, RagError>;
}
