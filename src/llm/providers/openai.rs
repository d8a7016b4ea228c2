//! `OpenAI` provider implementation using the `async-openai` crate.
//!
//! Supports any `OpenAI`-compatible API (`OpenAI`, Azure, local proxies)
//! via the base URL override in [`RagConfig`].

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
    CreateChatCompletionRequest, ResponseFormat,
};
use async_trait::async_trait;

use crate::config::RagConfig;
use crate::error::RagError;
use crate::llm::message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
use crate::llm::provider::LlmProvider;

/// `OpenAI`-compatible LLM provider.
///
/// Wraps the `async-openai` client for chat completions. Enforces JSON
/// output natively via `response_format: json_object`.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    /// Creates a new provider from orchestrator configuration.
    #[must_use]
    pub fn new(config: &RagConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
        }
    }

    /// Converts our message type to the `OpenAI` SDK type.
    pub(crate) fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: async_openai::types::ChatCompletionRequestSystemMessageContent::Text(
                        msg.content.clone(),
                    ),
                    name: None,
                })
            }
            Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: async_openai::types::ChatCompletionRequestUserMessageContent::Text(
                    msg.content.clone(),
                ),
                name: None,
            }),
            Role::Assistant => {
                #[allow(deprecated)]
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(
                        async_openai::types::ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        ),
                    ),
                    name: None,
                    tool_calls: None,
                    refusal: None,
                    audio: None,
                    function_call: None,
                })
            }
        }
    }

    /// Builds an `OpenAI` chat completion request from our generic request.
    pub(crate) fn build_request(
        request: &ChatRequest,
        enforce_json: bool,
    ) -> CreateChatCompletionRequest {
        let messages: Vec<_> = request.messages.iter().map(Self::convert_message).collect();

        let response_format = if request.json_mode && enforce_json {
            Some(ResponseFormat::JsonObject)
        } else {
            None
        };

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            response_format,
            ..Default::default()
        }
    }

    /// Extracts the first choice's content and usage from an SDK response.
    pub(crate) fn convert_response(
        response: async_openai::types::CreateChatCompletionResponse,
    ) -> ChatResponse {
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .unwrap_or_default();

        let usage = response
            .usage
            .map_or_else(TokenUsage::default, |u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            });

        ChatResponse { content, usage }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError> {
        let openai_request = Self::build_request(request, true);

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| RagError::Completion {
                message: e.to_string(),
            })?;

        Ok(Self::convert_response(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::message;

    #[test]
    fn test_convert_system_message() {
        let msg = message::system_message("test");
        let converted = OpenAiProvider::convert_message(&msg);
        assert!(matches!(converted, ChatCompletionRequestMessage::System(_)));
    }

    #[test]
    fn test_convert_user_message() {
        let msg = message::user_message("hello");
        let converted = OpenAiProvider::convert_message(&msg);
        assert!(matches!(converted, ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_convert_assistant_message() {
        let msg = message::assistant_message("answer");
        let converted = OpenAiProvider::convert_message(&msg);
        assert!(matches!(
            converted,
            ChatCompletionRequestMessage::Assistant(_)
        ));
    }

    #[test]
    fn test_build_request_json_mode() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![message::user_message("test")],
            temperature: Some(0.0),
            json_mode: true,
        };
        let built = OpenAiProvider::build_request(&request, true);
        assert!(matches!(
            built.response_format,
            Some(ResponseFormat::JsonObject)
        ));
    }

    #[test]
    fn test_build_request_json_mode_not_enforced() {
        let request = ChatRequest {
            model: "llama-3.1-70b-versatile".to_string(),
            messages: vec![message::user_message("test")],
            temperature: None,
            json_mode: true,
        };
        let built = OpenAiProvider::build_request(&request, false);
        assert!(built.response_format.is_none());
    }

    #[test]
    fn test_build_request_plain() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![message::user_message("test")],
            temperature: Some(0.7),
            json_mode: false,
        };
        let built = OpenAiProvider::build_request(&request, true);
        assert!(built.response_format.is_none());
        assert_eq!(built.model, "gpt-4o-mini");
        assert_eq!(built.messages.len(), 1);
    }
}
