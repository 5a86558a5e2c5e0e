//! Gemini brain implementation using the `generateContent` endpoint.
//!
//! Gemini takes a single prompt, so the request's instruction and input are
//! joined before sending.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_brain::{Brain, GeminiBrain, GenerationRequest};
//!
//! let brain = GeminiBrain::from_env()?;
//! let text = brain.generate(GenerationRequest::new("Write a short greeting.")).await?;
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::GeminiBrain;
pub use config::{GeminiBrainConfig, GeminiBrainConfigBuilder};

pub use brain_core::{Brain, BrainError, GenerationRequest};
