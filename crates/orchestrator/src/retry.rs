//! Shared retry helper with categorized outcomes.

use std::future::Future;

use tracing::{info, warn};

use crate::error::{ErrorClass, OrchestratorError};
use crate::pacing::Pacing;

/// Result of a retried operation.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation succeeded.
    Success(T),
    /// The candidate should be passed over.
    Skip(OrchestratorError),
    /// The session cannot continue.
    Fatal(OrchestratorError),
}

impl<T> Outcome<T> {
    /// Collapse into a `Result`, treating `Skip` and `Fatal` alike.
    pub fn into_result(self) -> Result<T, OrchestratorError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Skip(e) | Outcome::Fatal(e) => Err(e),
        }
    }
}

/// What to do once transient failures use up every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    Skip,
    Fatal,
}

/// Attempt budget and pause between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause bounds in seconds.
    pub pause_secs: (f64, f64),
    pub on_exhausted: Exhaustion,
}

impl RetryPolicy {
    /// Login: 3 attempts, 5-7 s apart, then the session is abandoned.
    pub fn login() -> Self {
        Self {
            max_attempts: 3,
            pause_secs: (5.0, 7.0),
            on_exhausted: Exhaustion::Fatal,
        }
    }

    /// Publishing: 3 attempts, 5 s apart, then the post is given up.
    pub fn publish() -> Self {
        Self {
            max_attempts: 3,
            pause_secs: (5.0, 5.0),
            on_exhausted: Exhaustion::Skip,
        }
    }

    /// A single UI step on one candidate: no retry.
    pub fn candidate() -> Self {
        Self {
            max_attempts: 1,
            pause_secs: (0.0, 0.0),
            on_exhausted: Exhaustion::Skip,
        }
    }
}

/// Run `op` until it succeeds, fails non-transiently, or the budget is spent.
///
/// `op` receives the 1-based attempt number so callers can recover (for
/// example refresh the page) before retrying.
pub async fn retry<T, F, Fut>(
    policy: RetryPolicy,
    pacing: Pacing,
    label: &str,
    mut op: F,
) -> Outcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, OrchestratorError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match op(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{} succeeded on attempt {}", label, attempt);
                }
                return Outcome::Success(value);
            }
            Err(e) => e,
        };

        match error.class() {
            ErrorClass::Fatal => return Outcome::Fatal(error),
            ErrorClass::Skip => return Outcome::Skip(error),
            ErrorClass::Transient => {
                warn!("{} attempt {}/{} failed: {}", label, attempt, attempts, error);
                if attempt >= attempts {
                    return match policy.on_exhausted {
                        Exhaustion::Skip => Outcome::Skip(error),
                        Exhaustion::Fatal => Outcome::Fatal(error),
                    };
                }
            }
        }

        pacing.pause(policy.pause_secs.0, policy.pause_secs.1).await;
        attempt += 1;
    }
}
