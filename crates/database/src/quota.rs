//! Daily action counts by calendar-date prefix.
//!
//! A record counts towards a day when its timestamp string starts with that
//! day's `YYYY-MM-DD`. The cutover at local midnight is hard, not rolling.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ActionType;

fn count_query(action: ActionType) -> &'static str {
    match action {
        ActionType::Post => "SELECT COUNT(*) FROM tweets WHERE timestamp LIKE ?",
        ActionType::Follow => "SELECT COUNT(*) FROM followed WHERE followed_at LIKE ?",
        ActionType::Like => "SELECT COUNT(*) FROM likes WHERE liked_at LIKE ?",
        ActionType::Comment => "SELECT COUNT(*) FROM comments WHERE commented_at LIKE ?",
    }
}

/// Count the records of an action type whose timestamp starts with `date` (`YYYY-MM-DD`).
pub async fn count_on(pool: &SqlitePool, action: ActionType, date: &str) -> Result<i64> {
    let pattern = format!("{}%", date);
    let (count,): (i64,) = sqlx::query_as(count_query(action))
        .bind(pattern)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
