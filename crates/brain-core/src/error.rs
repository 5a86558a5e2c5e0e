//! Error types for generation calls.

use thiserror::Error;

/// Errors that can occur while generating text.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The provider is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected or failed the request.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The request never reached the provider or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// Missing or invalid provider configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider answered without any text.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}
