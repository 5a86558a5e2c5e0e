//! Configuration for GeminiBrain.

use brain_core::BrainError;
use std::env;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for GeminiBrain.
#[derive(Debug, Clone)]
pub struct GeminiBrainConfig {
    /// Gemini API URL.
    pub api_url: String,

    /// API key, sent as the `key` query parameter.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum output tokens, unless the request sets its own.
    pub max_tokens: Option<u32>,

    /// Temperature, unless the request sets its own.
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GeminiBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            temperature: None,
            timeout_secs: 60,
        }
    }
}

impl GeminiBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY` - API key
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-1.5-flash)
    /// - `GEMINI_TIMEOUT_SECS` - Request timeout (default: 60)
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| BrainError::Configuration("GEMINI_API_KEY not set".to_string()))?;

        Ok(Self::from_env_with_key(api_key))
    }

    /// Environment-derived settings with an explicit key (the stored account key).
    pub fn from_env_with_key(api_key: impl Into<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: env::var("GEMINI_API_URL").unwrap_or(defaults.api_url),
            api_key: api_key.into(),
            model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiBrainConfigBuilder {
        GeminiBrainConfigBuilder::default()
    }
}

/// Builder for GeminiBrainConfig.
#[derive(Debug, Default)]
pub struct GeminiBrainConfigBuilder {
    config: GeminiBrainConfig,
}

impl GeminiBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the max output tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiBrainConfig {
        self.config
    }
}
