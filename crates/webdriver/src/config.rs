//! Configuration types for the WebDriver client.

use std::time::Duration;

/// Configuration for connecting to a WebDriver server.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Base URL of the driver (e.g., "http://localhost:9515").
    pub base_url: String,
    /// Run the browser without a window.
    pub headless: bool,
    /// Extra browser command-line arguments.
    pub browser_args: Vec<String>,
    /// Timeout for a single driver command.
    pub command_timeout: Duration,
    /// Interval between polls while waiting for an element.
    pub poll_interval: Duration,
}

impl DriverConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headless: false,
            browser_args: vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
            ],
            command_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(250),
        }
    }

    /// Enable or disable headless mode.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Get the base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Get the status endpoint URL.
    pub fn status_url(&self) -> String {
        format!("{}/status", self.base())
    }

    /// Get the new-session endpoint URL.
    pub fn session_url(&self) -> String {
        format!("{}/session", self.base())
    }

    /// Browser arguments including the headless flag when enabled.
    pub fn effective_args(&self) -> Vec<String> {
        let mut args = self.browser_args.clone();
        if self.headless && !args.iter().any(|a| a.starts_with("--headless")) {
            args.push("--headless".to_string());
        }
        args
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new("http://localhost:9515")
    }
}
