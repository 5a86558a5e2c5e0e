//! OpenAiBrain implementation using the chat-completions API.

use std::time::Duration;

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiBrainConfig;

/// A brain implementation that uses OpenAI chat completions.
///
/// Each call is stateless: the instruction becomes the system message and
/// the optional input the user message.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("OpenAI API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        debug!("OpenAiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(OpenAiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    /// Build the chat request for a generation request.
    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let mut messages = vec![ChatMessage::system(request.instruction.clone())];
        if let Some(ref input) = request.input {
            messages.push(ChatMessage::user(input.clone()));
        }

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens.or(self.config.max_tokens),
            temperature: request.temperature.or(self.config.temperature),
        }
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url.trim_end_matches('/'));

        debug!("Sending request to OpenAI API: model={}", request.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            if status.as_u16() == 429 || status.is_server_error() {
                return Err(BrainError::Unavailable(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }
}

/// Map a transport failure to a brain error.
fn map_send_error(e: reqwest::Error) -> BrainError {
    if e.is_timeout() {
        BrainError::Timeout
    } else {
        BrainError::Network(format!("Failed to send request: {}", e))
    }
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        let chat_request = self.build_request(&request);
        let completion = self.chat_completion(chat_request).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| BrainError::EmptyResponse(self.name().to_string()))
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}
