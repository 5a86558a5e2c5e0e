//! Error types for orchestrator operations.

use brain_core::BrainError;
use headline_fetcher::FetchError;
use thiserror::Error;
use xbot_database::{DatabaseError, ValidationError};

/// Failures reported by a [`crate::Platform`] adapter.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// A page element was not present.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A page element was detached while in use.
    #[error("stale element: {0}")]
    StaleElement(String),

    /// Another element received the click.
    #[error("click intercepted: {0}")]
    ClickIntercepted(String),

    /// A wait for page state ran out.
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// The browser or driver connection was lost.
    #[error("browser connection lost: {0}")]
    Connection(String),

    /// Anything else the adapter could not do.
    #[error("{0}")]
    Other(String),
}

/// How a failure should be handled by the retry helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth another attempt.
    Transient,
    /// Give up on this candidate, carry on with the next.
    Skip,
    /// The session cannot continue.
    Fatal,
}

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Browser automation failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Store access failed.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Text generation failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Headline source failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A settings field failed validation.
    #[error("invalid settings: {0}")]
    Validation(#[from] ValidationError),

    /// Settings were structurally wrong (bad JSON, unknown provider).
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Every login attempt failed.
    #[error("login failed after {attempts} attempts: {last_error}")]
    LoginFailed { attempts: u32, last_error: String },

    /// The candidate was intentionally passed over.
    #[error("skipped: {0}")]
    Skipped(String),
}

impl OrchestratorError {
    /// Categorize the error for retry decisions.
    pub fn class(&self) -> ErrorClass {
        if self.is_connection() {
            return ErrorClass::Fatal;
        }

        match self {
            OrchestratorError::Platform(_) | OrchestratorError::Brain(_) => ErrorClass::Transient,
            OrchestratorError::Fetch(_) => ErrorClass::Transient,
            OrchestratorError::Skipped(_) => ErrorClass::Skip,
            OrchestratorError::Database(_)
            | OrchestratorError::Validation(_)
            | OrchestratorError::InvalidSettings(_)
            | OrchestratorError::LoginFailed { .. } => ErrorClass::Fatal,
        }
    }

    /// True when the browser session is gone and must be rebuilt.
    ///
    /// Adapters do not always classify lost connections, so the message text
    /// is checked as well.
    pub fn is_connection(&self) -> bool {
        match self {
            OrchestratorError::Platform(PlatformError::Connection(_)) => true,
            OrchestratorError::Platform(_) => self.to_string().to_lowercase().contains("connection"),
            _ => false,
        }
    }
}
