//! Runtime configuration for the xbot binary.

use std::env;
use std::path::PathBuf;

use thiserror::Error;
use webdriver::{ProcessConfig, DEFAULT_DRIVER_PATH};
use xbot_database::DEFAULT_DB_PATH;

/// Default platform origin.
pub const DEFAULT_BASE_URL: &str = "https://x.com";

/// Default port for a spawned chromedriver.
pub const DEFAULT_DRIVER_PORT: u16 = 9515;

/// Default directory for log files.
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Invalid environment values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a port number, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
}

/// Where the bot keeps its state and how it reaches the browser.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// SQLite file.
    pub db_path: PathBuf,
    /// chromedriver binary to spawn when no running driver is configured.
    pub driver_path: PathBuf,
    /// URL of an already running driver. Takes precedence over spawning.
    pub driver_url: Option<String>,
    /// Port for a spawned driver.
    pub driver_port: u16,
    /// Platform origin, without a trailing slash.
    pub base_url: String,
    pub log_dir: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            driver_path: PathBuf::from(DEFAULT_DRIVER_PATH),
            driver_url: None,
            driver_port: DEFAULT_DRIVER_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl BotConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `XBOT_DB_PATH` - SQLite file (default: ./Database/memories.db)
    /// - `CHROMEDRIVER_PATH` - chromedriver binary (default: chromedriver)
    /// - `CHROMEDRIVER_URL` - Use a running driver instead of spawning one
    /// - `WEBDRIVER_PORT` - Port for a spawned driver (default: 9515)
    /// - `XBOT_BASE_URL` - Platform origin (default: https://x.com)
    /// - `XBOT_LOG_DIR` - Log directory (default: ./logs)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let driver_port = match env::var("WEBDRIVER_PORT") {
            Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: "WEBDRIVER_PORT",
                value,
            })?,
            Err(_) => defaults.driver_port,
        };

        let mut builder = Self::builder().driver_port(driver_port);

        if let Ok(path) = env::var("XBOT_DB_PATH") {
            builder = builder.db_path(path);
        }
        if let Ok(path) = env::var("CHROMEDRIVER_PATH") {
            builder = builder.driver_path(path);
        }
        if let Ok(url) = env::var("CHROMEDRIVER_URL") {
            if !url.trim().is_empty() {
                builder = builder.driver_url(url);
            }
        }
        if let Ok(url) = env::var("XBOT_BASE_URL") {
            builder = builder.base_url(url);
        }
        if let Ok(dir) = env::var("XBOT_LOG_DIR") {
            builder = builder.log_dir(dir);
        }

        Ok(builder.build())
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Settings for spawning a local driver.
    pub fn process_config(&self, headless: bool) -> ProcessConfig {
        ProcessConfig::new(&self.driver_path)
            .with_port(self.driver_port)
            .with_headless(headless)
    }
}

/// Builder for BotConfig.
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    config: BotConfig,
}

impl BotConfigBuilder {
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    pub fn driver_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.driver_path = path.into();
        self
    }

    pub fn driver_url(mut self, url: impl Into<String>) -> Self {
        self.config.driver_url = Some(url.into());
        self
    }

    pub fn driver_port(mut self, port: u16) -> Self {
        self.config.driver_port = port;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = dir.into();
        self
    }

    pub fn build(self) -> BotConfig {
        self.config
    }
}
