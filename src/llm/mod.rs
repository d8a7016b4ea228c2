//! LLM gateway: provider-agnostic messages, the provider trait, concrete
//! backends, and the completion client.

pub mod client;
pub mod message;
pub mod provider;
pub mod providers;

pub use client::{CompletionOptions, LlmClient, create_provider};
pub use message::{
    ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage, assistant_message, system_message,
    user_message,
};
pub use provider::LlmProvider;

/// Scripted mock provider shared by gateway, router, executor, and
/// pipeline tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::message::{ChatRequest, ChatResponse, TokenUsage};
    use super::provider::LlmProvider;
    use crate::error::RagError;

    /// Replays a fixed script of responses, recording every request.
    ///
    /// When the script runs out, the last entry repeats, so a one-entry
    /// script models a model that always answers the same way.
    pub struct MockProvider {
        script: Vec<Result<String, String>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl MockProvider {
        pub fn with_script(script: Vec<Result<String, String>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_responses(responses: Vec<String>) -> Self {
            Self::with_script(responses.into_iter().map(Ok).collect())
        }

        pub fn failing(message: &str) -> Self {
            Self::with_script(vec![Err(message.to_string())])
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<ChatRequest> {
            self.requests
                .lock()
                .map(|g| g.clone())
                .unwrap_or_else(|_| unreachable!())
        }
    }

    #[async_trait]
    impl LlmProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError> {
            if let Ok(mut guard) = self.requests.lock() {
                guard.push(request.clone());
            }
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            let entry = self
                .script
                .get(idx)
                .or_else(|| self.script.last())
                .cloned()
                .unwrap_or_else(|| Err("mock script empty".to_string()));

            match entry {
                Ok(content) => Ok(ChatResponse {
                    content,
                    usage: TokenUsage::default(),
                }),
                Err(message) => Err(RagError::Completion { message }),
            }
        }
    }
}
