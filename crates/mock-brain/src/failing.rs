//! Failing brain implementation - every call errors.

use async_trait::async_trait;
use brain_core::{Brain, BrainError, GenerationRequest};

/// A brain whose every call fails with the same message.
///
/// Useful for exercising fallback paths.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    message: String,
}

impl FailingBrain {
    /// Create a failing brain with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new("provider unavailable")
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, BrainError> {
        Err(BrainError::Unavailable(self.message.clone()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let brain = FailingBrain::new("401 unauthorized");

        let err = brain.generate(GenerationRequest::new("hi")).await.unwrap_err();
        assert_eq!(err.to_string(), "brain unavailable: 401 unauthorized");
        assert!(!brain.is_ready().await);
    }
}
