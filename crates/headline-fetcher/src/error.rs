//! Error types for headline fetching.

use thiserror::Error;

/// Errors that can occur while fetching headlines.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source URL could not be parsed.
    #[error("invalid source URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Every attempt failed.
    #[error("giving up on {url} after {attempts} attempts: {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}
