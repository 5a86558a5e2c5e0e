//! Provider clients for the configured API type.

use std::sync::Arc;

use brain_core::{Brain, BrainError, ProviderKind};
use gemini_brain::{GeminiBrain, GeminiBrainConfig};
use openai_brain::{OpenAiBrain, OpenAiBrainConfig};
use orchestrator::BrainFactory;

/// Builds OpenAI or Gemini clients, taking URLs and models from the environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvBrainFactory;

impl BrainFactory for EnvBrainFactory {
    fn create(&self, provider: ProviderKind, api_key: &str) -> Result<Arc<dyn Brain>, BrainError> {
        let brain: Arc<dyn Brain> = match provider {
            ProviderKind::OpenAi => {
                Arc::new(OpenAiBrain::new(OpenAiBrainConfig::from_env_with_key(api_key))?)
            }
            ProviderKind::Gemini => {
                Arc::new(GeminiBrain::new(GeminiBrainConfig::from_env_with_key(api_key))?)
            }
        };
        Ok(brain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_each_provider() {
        let factory = EnvBrainFactory;
        let openai = factory.create(ProviderKind::OpenAi, "sk-test").unwrap();
        assert_eq!(openai.name(), "OpenAiBrain");

        let gemini = factory.create(ProviderKind::Gemini, "gm-test").unwrap();
        assert_eq!(gemini.name(), "GeminiBrain");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(EnvBrainFactory.create(ProviderKind::OpenAi, "").is_err());
    }
}
