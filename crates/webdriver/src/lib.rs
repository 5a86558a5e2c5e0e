//! W3C WebDriver client library.
//!
//! This crate provides a small async client for a WebDriver server such as
//! chromedriver. It supports:
//!
//! - Spawning and health-checking a local chromedriver process
//! - Creating browser sessions (optionally headless)
//! - Navigation, element lookup by CSS or XPath, clicks, typing and scripts
//!
//! # Example
//!
//! ```no_run
//! use webdriver::{DriverConfig, Locator, WebDriverClient};
//!
//! # async fn example() -> Result<(), webdriver::WebDriverError> {
//! let client = WebDriverClient::connect(DriverConfig::default()).await?;
//! let session = client.new_session().await?;
//!
//! session.navigate("https://example.com").await?;
//! let heading = session.find_element(&Locator::css("h1")).await?;
//! println!("{}", session.text(&heading).await?);
//!
//! session.delete().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod process;
pub mod types;

pub use client::{Session, WebDriverClient};
pub use config::DriverConfig;
pub use error::WebDriverError;
pub use process::{spawn_and_connect, DriverProcess, ProcessConfig, DEFAULT_DRIVER_PATH};
pub use types::{ElementRef, Locator, ELEMENT_KEY, KEY_ENTER};
