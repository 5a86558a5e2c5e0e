//! SQLite persistence layer for xbot.
//!
//! This crate provides async database operations for credentials, personality
//! presets, provider keys, fetched headlines and the action history (tweets,
//! follows, likes, replies) that backs the daily quotas, using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{credential, quota, timestamp, ActionType, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:Database/memories.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     credential::create_credential(db.pool(), "newsbot", "hunter2", "bot@example.com", None, None)
//!         .await?;
//!
//!     let posted = quota::count_on(db.pool(), ActionType::Post, &timestamp::today()).await?;
//!     println!("posted today: {}", posted);
//!
//!     Ok(())
//! }
//! ```

pub mod api_key;
pub mod comment;
pub mod credential;
pub mod error;
pub mod follow;
pub mod headline;
pub mod like;
pub mod models;
pub mod personality;
pub mod quota;
pub mod run_counter;
pub mod timestamp;
pub mod tweet;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    ActionType, ApiKey, Comment, Credential, FollowedAccount, Headline, LikedPost,
    PersonalityPreset, SelfUpdate, Tweet,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Default on-disk location of the store.
pub const DEFAULT_DB_PATH: &str = "./Database/memories.db";

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// The bot is a single sequential actor; a small pool covers the CLI and the run loop.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::connect(&format!("sqlite:{}?mode=rwc", path.display())).await
    }

    /// Connect to a private in-memory database.
    ///
    /// Uses a single connection so every query sees the same database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect_with_pool_size("sqlite::memory:", 1).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    /// Tables written by older releases are kept; a legacy `comments` table is
    /// upgraded in place.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        if comment::upgrade_legacy_table(&self.pool).await? {
            tracing::info!("Upgraded legacy comments table");
        }

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
