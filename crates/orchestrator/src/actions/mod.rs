//! Action executors run once per cycle.
//!
//! Each executor checks its quota, drives the platform, persists what it did
//! and returns an [`ActionReport`]. Only connection loss escapes an executor.

pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod research;

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use brain_core::Brain;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info, warn};

use crate::cache::ContentCache;
use crate::error::{OrchestratorError, PlatformError};
use crate::pacing::Pacing;
use crate::platform::Platform;
use crate::quota::QuotaLedger;
use crate::retry::{retry, Outcome, RetryPolicy};
use crate::settings::SessionSettings;
use crate::source::HeadlineSource;

/// Result of one executor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionReport {
    /// Number of actions taken.
    Completed(u32),
    Skipped(String),
    Failed(String),
}

impl ActionReport {
    /// Actions taken, 0 unless completed.
    pub fn count(&self) -> u32 {
        match self {
            ActionReport::Completed(n) => *n,
            _ => 0,
        }
    }
}

/// Collaborators shared by every executor in a cycle.
#[derive(Clone, Copy)]
pub struct ActionContext<'a> {
    pub platform: &'a dyn Platform,
    pub brain: &'a dyn Brain,
    pub source: &'a dyn HeadlineSource,
    pub quotas: &'a QuotaLedger,
    pub cache: &'a ContentCache,
    pub settings: &'a SessionSettings,
    pub pacing: Pacing,
}

/// Turn an executor failure into a report unless the session is gone.
pub(crate) fn contain(
    label: &str,
    result: Result<ActionReport, OrchestratorError>,
) -> Result<ActionReport, OrchestratorError> {
    match result {
        Ok(report) => Ok(report),
        Err(e) if e.is_connection() => Err(e),
        Err(e) => {
            error!("{} failed: {}", label, e);
            Ok(ActionReport::Failed(e.to_string()))
        }
    }
}

/// Log a per-candidate UI failure, propagating only connection loss.
pub(crate) fn tolerate(label: &str, e: PlatformError) -> Result<(), OrchestratorError> {
    let e = OrchestratorError::from(e);
    if e.is_connection() {
        return Err(e);
    }
    warn!("Skipping {} due to error: {}", label, e);
    Ok(())
}

/// Run one UI step on a candidate. `Ok(None)` means the candidate is passed over.
pub(crate) async fn on_candidate<T, F, Fut>(
    pacing: Pacing,
    label: &str,
    step: F,
) -> Result<Option<T>, OrchestratorError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, OrchestratorError>>,
{
    match retry(RetryPolicy::candidate(), pacing, label, step).await {
        Outcome::Success(value) => Ok(Some(value)),
        Outcome::Skip(e) => {
            warn!("Skipping {} due to error: {}", label, e);
            Ok(None)
        }
        Outcome::Fatal(e) => Err(e),
    }
}

/// Pick a random keyword from a non-empty list.
pub(crate) fn pick_keyword(keywords: &[String]) -> Option<String> {
    keywords.choose(&mut rand::thread_rng()).cloned()
}

/// Stand-in id for a post without a readable permalink.
pub(crate) fn fallback_post_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("tweet_{}_{}", millis, rand::thread_rng().gen_range(1..=10_000))
}

/// Scroll budget shared by the search-driven executors.
///
/// Stops when the budget is spent or two consecutive page heights match.
pub(crate) struct ScrollBudget {
    left: u32,
    last_height: u64,
}

impl ScrollBudget {
    pub(crate) async fn start(
        platform: &dyn Platform,
        attempts: u32,
    ) -> Result<Self, OrchestratorError> {
        let last_height = match platform.page_height().await {
            Ok(height) => height,
            Err(e) => {
                tolerate("page height", e)?;
                0
            }
        };
        Ok(Self {
            left: attempts,
            last_height,
        })
    }

    /// Whether another pass over the candidates is allowed.
    pub(crate) fn has_budget(&self) -> bool {
        self.left > 0
    }

    /// Consume one pass of the budget.
    pub(crate) fn spend(&mut self) {
        self.left = self.left.saturating_sub(1);
    }

    /// Scroll for more content; `false` when nothing new loaded.
    pub(crate) async fn advance(
        &mut self,
        platform: &dyn Platform,
        pacing: Pacing,
    ) -> Result<bool, OrchestratorError> {
        info!("Scrolling to load more content");
        let height = match platform.scroll().await {
            Ok(height) => height,
            Err(e) => {
                tolerate("scroll", e)?;
                return Ok(true);
            }
        };
        pacing.pause(2.0, 4.0).await;

        if height == self.last_height {
            info!("No new content loaded, stopping scroll");
            return Ok(false);
        }
        self.last_height = height;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contain_keeps_connection_errors() {
        let report = contain(
            "like",
            Err(PlatformError::ElementNotFound("like button".into()).into()),
        )
        .unwrap();
        assert!(matches!(report, ActionReport::Failed(_)));

        let err = contain(
            "like",
            Err(PlatformError::Connection("driver died".into()).into()),
        )
        .unwrap_err();
        assert!(err.is_connection());
    }

    #[tokio::test]
    async fn test_on_candidate_passes_over_ui_errors() {
        let skipped: Option<()> = on_candidate(Pacing::Instant, "like button", |_| async {
            Err(PlatformError::StaleElement("button".into()).into())
        })
        .await
        .unwrap();
        assert!(skipped.is_none());

        let err = on_candidate::<(), _, _>(Pacing::Instant, "like button", |_| async {
            Err(PlatformError::Connection("driver died".into()).into())
        })
        .await
        .unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_fallback_post_id_shape() {
        let id = fallback_post_id();
        assert!(id.starts_with("tweet_"));
        assert_eq!(id.split('_').count(), 3);
    }

    #[test]
    fn test_report_count() {
        assert_eq!(ActionReport::Completed(2).count(), 2);
        assert_eq!(ActionReport::Skipped("limit".into()).count(), 0);
    }
}
