//! Serper.dev search client.
//!
//! `POST https://google.serper.dev/search` with an `X-API-KEY` header and
//! a `{"q": "<query>"}` body. One shared `reqwest::Client` carries the
//! configured timeout for all calls.

use async_trait::async_trait;
use serde_json::json;

use super::{WebSearchApi, WebSearchResponse};
use crate::config::RagConfig;
use crate::error::RagError;

/// Serper API endpoint.
const SERPER_URL: &str = "https://google.serper.dev/search";

/// Web search client backed by the Serper.dev API.
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

impl SerperClient {
    /// Creates a client from orchestrator configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ApiKeyMissing`] when no Serper key is configured.
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        let api_key = config
            .serper_api_key
            .clone()
            .ok_or(RagError::ApiKeyMissing)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::WebSearch {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            url: SERPER_URL.to_string(),
        })
    }

    /// Overrides the endpoint URL (for proxies and tests).
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl WebSearchApi for SerperClient {
    async fn search(&self, query: &str) -> Result<WebSearchResponse, RagError> {
        let response = self
            .client
            .post(&self.url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await
            .map_err(|e| RagError::WebSearch {
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| RagError::WebSearch {
                message: e.to_string(),
            })?;

        response
            .json::<WebSearchResponse>()
            .await
            .map_err(|e| RagError::WebSearch {
                message: format!("invalid search response: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = RagConfig::builder()
            .api_key("llm-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert!(matches!(
            SerperClient::new(&config),
            Err(RagError::ApiKeyMissing)
        ));
    }

    #[test]
    fn test_response_deserialization_tolerates_extra_fields() {
        let body = r#"{
            "searchParameters": {"q": "rust"},
            "organic": [
                {"title": "Rust", "snippet": "A language", "link": "https://rust-lang.org", "position": 1}
            ],
            "credits": 1
        }"#;
        let parsed: WebSearchResponse =
            serde_json::from_str(body).unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_eq!(parsed.organic.len(), 1);
        assert_eq!(parsed.organic[0].title, "Rust");
    }

    #[test]
    fn test_response_deserialization_missing_organic() {
        let parsed: WebSearchResponse = serde_json::from_str("{}")
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert!(parsed.organic.is_empty());
    }
}
