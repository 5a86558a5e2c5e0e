//! Generation request type.

use serde::{Deserialize, Serialize};

/// A single prompt sent to a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The instruction describing what to write.
    ///
    /// Chat-style providers send it as the system message.
    pub instruction: String,
    /// Optional short user turn ("Generate a tweet.").
    pub input: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a request with only an instruction.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            input: None,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the user turn.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Set the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Instruction and input joined into one prompt, for single-turn providers.
    pub fn combined_prompt(&self) -> String {
        match &self.input {
            Some(input) => format!("{}\n\n{}", self.instruction, input),
            None => self.instruction.clone(),
        }
    }
}
