//! Process management for spawning a local chromedriver.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::DriverConfig;
use crate::error::WebDriverError;
use crate::WebDriverClient;

/// Default chromedriver binary, resolved through `PATH`.
pub const DEFAULT_DRIVER_PATH: &str = "chromedriver";

/// Configuration for spawning a chromedriver process.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Path to the chromedriver binary.
    pub driver_path: PathBuf,
    /// Port the driver listens on.
    pub port: u16,
    /// Run browsers headless.
    pub headless: bool,
}

impl ProcessConfig {
    /// Create a new process config.
    pub fn new(driver_path: impl Into<PathBuf>) -> Self {
        Self {
            driver_path: driver_path.into(),
            port: 9515,
            headless: false,
        }
    }

    /// Set the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable headless browsers.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Get the base URL for connecting to this driver.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Convert to a DriverConfig for connecting.
    pub fn to_driver_config(&self) -> DriverConfig {
        DriverConfig::new(self.base_url()).with_headless(self.headless)
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DRIVER_PATH)
    }
}

/// A running chromedriver process.
pub struct DriverProcess {
    child: Child,
    config: ProcessConfig,
}

impl DriverProcess {
    /// Spawn a new chromedriver process.
    pub fn spawn(config: ProcessConfig) -> Result<Self, WebDriverError> {
        let mut cmd = Command::new(&config.driver_path);
        cmd.arg(format!("--port={}", config.port))
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        info!(
            "Spawning chromedriver: {:?} --port={}",
            config.driver_path, config.port
        );

        let child = cmd.spawn().map_err(|e| {
            WebDriverError::Config(format!(
                "Failed to spawn chromedriver at {:?}: {}",
                config.driver_path, e
            ))
        })?;

        debug!("Driver process started with PID {}", child.id());

        Ok(Self { child, config })
    }

    /// Wait for the driver to report ready.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<(), WebDriverError> {
        let client = reqwest::Client::new();
        let status_url = self.config.to_driver_config().status_url();
        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(100);

        info!("Waiting for driver to be ready at {}...", status_url);

        loop {
            if start.elapsed() > timeout {
                return Err(WebDriverError::Connection(format!(
                    "Driver not ready after {:?}",
                    timeout
                )));
            }

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("Driver is ready");
                    return Ok(());
                }
                Ok(_) => debug!("Status returned non-success, retrying..."),
                Err(e) => debug!("Status check failed: {}, retrying...", e),
            }

            sleep(poll_interval).await;
        }
    }

    /// Get the process ID.
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Get the process config.
    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Check if the process is still running.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kill the driver process.
    pub fn kill(&mut self) -> Result<(), WebDriverError> {
        info!("Killing driver process (PID {})", self.child.id());
        self.child
            .kill()
            .map_err(|e| WebDriverError::Connection(format!("Failed to kill driver: {}", e)))
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(e) = self.kill() {
                error!("Failed to kill driver on drop: {}", e);
            }
        }
    }
}

/// Spawn a driver and return a connected client.
pub async fn spawn_and_connect(
    config: ProcessConfig,
    ready_timeout: Duration,
) -> Result<(DriverProcess, WebDriverClient), WebDriverError> {
    let driver_config = config.to_driver_config();
    let process = DriverProcess::spawn(config)?;
    process.wait_ready(ready_timeout).await?;
    let client = WebDriverClient::connect(driver_config).await?;
    Ok((process, client))
}
