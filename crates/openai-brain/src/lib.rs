//! OpenAI-based brain implementation.
//!
//! This crate provides a brain implementation that sends each prompt to the
//! OpenAI chat-completions API as a system message, optionally followed by a
//! short user turn.
//!
//! # Usage
//!
//! ```rust,no_run
//! use brain_core::{Brain, GenerationRequest};
//! use openai_brain::{OpenAiBrain, OpenAiBrainConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAiBrainConfig::builder().api_key("sk-...").build();
//!     let brain = OpenAiBrain::new(config)?;
//!
//!     let text = brain
//!         .generate(GenerationRequest::new("You are a cheerful Berliner.").with_input("Generate a tweet."))
//!         .await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::OpenAiBrain;
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{Brain, BrainError, GenerationRequest};
