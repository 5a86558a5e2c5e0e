//! Core trait and types for text-generation providers.
//!
//! This crate provides the shared interface for all providers used by the
//! xbot automation loop. It defines:
//!
//! - [`Brain`] - The trait every provider backend implements
//! - [`GenerationRequest`] - A single prompt plus sampling options
//! - [`ProviderKind`] - The provider selected by a credential's `api_type`
//! - [`BrainError`] - Error types for generation calls
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, GenerationRequest};
//! use async_trait::async_trait;
//!
//! struct FixedBrain;
//!
//! #[async_trait]
//! impl Brain for FixedBrain {
//!     async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
//!         Ok(format!("echo: {}", request.instruction))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "FixedBrain"
//!     }
//! }
//! ```

mod error;
mod provider;
mod request;
mod trait_def;

pub use error::BrainError;
pub use provider::ProviderKind;
pub use request::GenerationRequest;
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
