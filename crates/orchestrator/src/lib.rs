//! Session supervisor, daily quotas and action executors for xbot.
//!
//! This crate owns the automation loop. It drives a [`Platform`] session
//! through fixed-order cycles while [`QuotaLedger`] enforces daily caps and
//! [`ContentCache`] keeps generated content from repeating.
//!
//! # Architecture
//!
//! ```text
//! Frontend (setup / settings)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SUPERVISOR                           │
//! │                                                             │
//! │  1. Sign in or sign up, collect settings                    │
//! │         ↓                                                   │
//! │  2. Open browser, log in (3 attempts)                       │
//! │         ↓                                                   │
//! │  3. Per cycle, in order:                                    │
//! │     • research → fetch and store new headlines              │
//! │     • post     → headline tweet or self update              │
//! │     • follow   → one account from a keyword search          │
//! │     • like     → one post from a keyword search             │
//! │     • comment  → one reply from a keyword search            │
//! │         ↓                                                   │
//! │  4. Sleep schedule_interval, repeat loop_count times        │
//! │         ↓                                                   │
//! │  5. Close browser, back to setup                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Connection loss during a cycle closes the browser and re-runs setup inline.
//!
//! # Example
//!
//! ```rust,ignore
//! use orchestrator::{Supervisor, SupervisorConfig};
//!
//! let supervisor = Supervisor::new(db, frontend, sessions, brains, source)
//!     .with_config(SupervisorConfig::default());
//! supervisor.run().await?;
//! ```

pub mod actions;
mod brains;
mod cache;
mod cycle;
mod error;
mod frontend;
pub mod generation;
pub mod language;
mod pacing;
mod platform;
pub mod prompt;
mod quota;
mod retry;
mod settings;
mod source;
mod supervisor;
pub mod text;

pub use actions::{ActionContext, ActionReport};
pub use brains::BrainFactory;
pub use cache::{ContentCache, RECENT_WINDOW};
pub use cycle::{run_cycle, CycleReport};
pub use error::{ErrorClass, OrchestratorError, PlatformError};
pub use frontend::{Frontend, SettingsOutcome, SetupChoice, SignUpForm};
pub use generation::{generate_unique, Generated};
pub use pacing::Pacing;
pub use platform::{AccountCandidate, Platform, PostCandidate, SearchTarget, SessionFactory};
pub use quota::{run_cap, QuotaLedger, PER_RUN_CEILING};
pub use retry::{retry, Exhaustion, Outcome, RetryPolicy};
pub use settings::{Personality, SessionSettings};
pub use source::HeadlineSource;
pub use supervisor::{ActiveSession, Established, SessionEnd, Supervisor, SupervisorConfig};
