//! Error types for the WebDriver client.

use thiserror::Error;

/// Errors that can occur when talking to a WebDriver server.
#[derive(Debug, Error)]
pub enum WebDriverError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The driver could not be reached or the browser went away.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The session no longer exists on the driver.
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// No element matched the locator.
    #[error("No such element: {0}")]
    NoSuchElement(String),

    /// The element was detached from the page.
    #[error("Stale element: {0}")]
    StaleElement(String),

    /// Another element would receive the click.
    #[error("Click intercepted: {0}")]
    ClickIntercepted(String),

    /// An element did not appear in time.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Any other W3C error response.
    #[error("WebDriver error '{error}': {message}")]
    Protocol { error: String, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WebDriverError {
    /// Build an error from a W3C `{error, message}` pair.
    pub fn from_w3c(error: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match error {
            "no such element" => WebDriverError::NoSuchElement(message),
            "stale element reference" => WebDriverError::StaleElement(message),
            "element click intercepted" => WebDriverError::ClickIntercepted(message),
            "timeout" | "script timeout" => WebDriverError::Timeout(message),
            "invalid session id" | "no such window" | "session not created" => {
                WebDriverError::InvalidSession(message)
            }
            other => WebDriverError::Protocol {
                error: other.to_string(),
                message,
            },
        }
    }

    /// True when the browser or driver link is lost and the session must be rebuilt.
    pub fn is_connection(&self) -> bool {
        match self {
            WebDriverError::Connection(_) | WebDriverError::InvalidSession(_) => true,
            WebDriverError::Http(e) => e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// True when the page simply lacked what was looked for.
    pub fn is_missing_element(&self) -> bool {
        matches!(
            self,
            WebDriverError::NoSuchElement(_) | WebDriverError::StaleElement(_)
        )
    }
}
