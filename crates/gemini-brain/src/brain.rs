//! GeminiBrain implementation.

use std::time::Duration;

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::config::GeminiBrainConfig;

/// A brain implementation that uses Google's Gemini models.
pub struct GeminiBrain {
    client: Client,
    config: GeminiBrainConfig,
}

impl GeminiBrain {
    /// Create a new GeminiBrain with the given configuration.
    pub fn new(config: GeminiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("Gemini API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        debug!("GeminiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiBrain from environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GeminiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiBrainConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest::single_prompt(
            request.combined_prompt(),
            GenerationConfig {
                max_output_tokens: request.max_tokens.or(self.config.max_tokens),
                temperature: request.temperature.or(self.config.temperature),
            },
        )
    }
}

#[async_trait]
impl Brain for GeminiBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        let body = self.build_request(&request);

        debug!("Sending request to Gemini API: model={}", self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            let detail = format!("API error ({}): {}", status.as_u16(), message);
            if status.as_u16() == 429 || status.is_server_error() {
                return Err(BrainError::Unavailable(detail));
            }
            return Err(BrainError::ProcessingFailed(detail));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        parsed
            .first_text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| BrainError::EmptyResponse(self.name().to_string()))
    }

    fn name(&self) -> &str {
        "GeminiBrain"
    }
}
