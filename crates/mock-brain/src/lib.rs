//! Mock brain implementations for testing generation flows.
//!
//! This crate provides mock implementations of the `Brain` trait for testing:
//! - `ScriptedBrain` - Replays a queue of canned outputs and records prompts
//! - `FailingBrain` - Fails every call with a fixed error
//!
//! For production text generation, use the `openai-brain` or `gemini-brain` crates.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, GenerationRequest, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::new(["first", "second"]);
//!
//!     let text = brain.generate(GenerationRequest::new("Write a tweet")).await?;
//!     assert_eq!(text, "first");
//!     Ok(())
//! }
//! ```

mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

// Export mock implementations
pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
