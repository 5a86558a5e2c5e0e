//! Daily quota checks over the action history.
//!
//! Counts are derived from stored timestamps, so a cap resets at local
//! midnight. Check-then-act is not atomic; the bot acts sequentially.

use chrono::NaiveDate;
use tracing::info;
use xbot_database::{quota, timestamp, ActionType, Database};

use crate::error::OrchestratorError;

/// Most actions of one type taken in a single cycle.
pub const PER_RUN_CEILING: u32 = 1;

/// Read-only view of today's action counts.
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    db: Database,
}

impl QuotaLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Actions of this type recorded today.
    pub async fn count_today(&self, action: ActionType) -> Result<i64, OrchestratorError> {
        Ok(quota::count_on(self.db.pool(), action, &timestamp::today()).await?)
    }

    /// Actions of this type recorded on `date`.
    pub async fn count_on(
        &self,
        action: ActionType,
        date: NaiveDate,
    ) -> Result<i64, OrchestratorError> {
        Ok(quota::count_on(self.db.pool(), action, &timestamp::date_prefix(date)).await?)
    }

    /// Whether another action fits under `daily_limit` (0 = unlimited).
    pub async fn under_limit(
        &self,
        action: ActionType,
        daily_limit: u32,
    ) -> Result<bool, OrchestratorError> {
        if daily_limit == 0 {
            return Ok(true);
        }
        let count = self.count_today(action).await?;
        if count >= i64::from(daily_limit) {
            info!(
                "Daily {} limit ({}) reached: {} today",
                action, daily_limit, count
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Actions left today, `None` when unlimited.
    pub async fn remaining(
        &self,
        action: ActionType,
        daily_limit: u32,
    ) -> Result<Option<u32>, OrchestratorError> {
        if daily_limit == 0 {
            return Ok(None);
        }
        let count = self.count_today(action).await?;
        let left = (i64::from(daily_limit) - count).max(0);
        Ok(Some(u32::try_from(left).unwrap_or(0)))
    }
}

/// Actions allowed this cycle: `min(remaining, ceiling)`.
pub fn run_cap(remaining: Option<u32>, ceiling: u32) -> u32 {
    match remaining {
        Some(left) => left.min(ceiling),
        None => ceiling,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbot_database::{comment, follow, like, tweet};

    async fn ledger() -> QuotaLedger {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        QuotaLedger::new(db)
    }

    #[tokio::test]
    async fn test_counts_today_and_tomorrow() {
        let ledger = ledger().await;
        let now = timestamp::now();
        for i in 0..3 {
            tweet::insert_tweet(ledger.db.pool(), tweet::SELF_UPDATE_TAG, &format!("t{}", i), &now)
                .await
                .unwrap();
        }

        assert_eq!(ledger.count_today(ActionType::Post).await.unwrap(), 3);
        let tomorrow = chrono::Local::now().date_naive().succ_opt().unwrap();
        assert_eq!(ledger.count_on(ActionType::Post, tomorrow).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_limits() {
        let ledger = ledger().await;
        let now = timestamp::now();
        like::record_like(ledger.db.pool(), "1", &now).await.unwrap();
        like::record_like(ledger.db.pool(), "2", &now).await.unwrap();

        assert!(!ledger.under_limit(ActionType::Like, 2).await.unwrap());
        assert!(ledger.under_limit(ActionType::Like, 3).await.unwrap());
        assert!(ledger.under_limit(ActionType::Like, 0).await.unwrap());

        assert_eq!(ledger.remaining(ActionType::Like, 2).await.unwrap(), Some(0));
        assert_eq!(ledger.remaining(ActionType::Like, 5).await.unwrap(), Some(3));
        assert_eq!(ledger.remaining(ActionType::Like, 0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_follows_and_comments_count_by_their_own_dates() {
        let ledger = ledger().await;
        let pool = ledger.db.pool();
        let now = timestamp::now();
        follow::record_follow(pool, "@alice", &now).await.unwrap();
        follow::record_follow(pool, "@bob", "2024-01-01 08:00:00").await.unwrap();
        comment::record_comment(pool, "1", "carol", "Nice one", &now).await.unwrap();
        comment::record_comment(pool, "2", "dave", "Agreed", &now).await.unwrap();
        comment::record_comment(pool, "3", "erin", "Old reply", "2024-01-01 09:00:00")
            .await
            .unwrap();

        assert_eq!(ledger.count_today(ActionType::Follow).await.unwrap(), 1);
        assert_eq!(ledger.count_today(ActionType::Comment).await.unwrap(), 2);

        let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(ledger.count_on(ActionType::Follow, new_year).await.unwrap(), 1);
        assert_eq!(ledger.count_on(ActionType::Comment, new_year).await.unwrap(), 1);
        assert_eq!(ledger.count_on(ActionType::Like, new_year).await.unwrap(), 0);

        assert!(!ledger.under_limit(ActionType::Comment, 2).await.unwrap());
        assert!(ledger.under_limit(ActionType::Follow, 2).await.unwrap());
    }

    #[test]
    fn test_run_cap() {
        assert_eq!(run_cap(Some(5), PER_RUN_CEILING), 1);
        assert_eq!(run_cap(Some(0), PER_RUN_CEILING), 0);
        assert_eq!(run_cap(None, PER_RUN_CEILING), 1);
    }
}
