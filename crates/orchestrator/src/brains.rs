//! Provider construction.

use std::sync::Arc;

use brain_core::{Brain, BrainError, ProviderKind};

/// Builds a provider client for a session.
pub trait BrainFactory: Send + Sync {
    fn create(&self, provider: ProviderKind, api_key: &str) -> Result<Arc<dyn Brain>, BrainError>;
}
