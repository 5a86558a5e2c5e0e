//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::request::GenerationRequest;

/// A text-generation provider.
///
/// Implementations range from scripted test doubles to hosted LLM APIs.
/// This trait is object-safe and can be used with `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Generate text for a single prompt.
    ///
    /// Returns the raw provider text, untrimmed and unsanitized.
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to generate.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
