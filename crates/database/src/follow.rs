//! Followed accounts.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::FollowedAccount;

/// Check whether an account has already been followed.
pub async fn is_followed(pool: &SqlitePool, username: &str) -> Result<bool> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM followed
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Record a follow unless the account is already stored.
///
/// Returns `true` if a new row was written.
pub async fn record_follow(pool: &SqlitePool, username: &str, at: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO followed (username, followed_at)
        VALUES (?, ?)
        "#,
    )
    .bind(username)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List followed accounts, most recent first.
pub async fn list_followed(pool: &SqlitePool, limit: i64) -> Result<Vec<FollowedAccount>> {
    let rows = sqlx::query_as::<_, FollowedAccount>(
        r#"
        SELECT id, username, followed_at
        FROM followed
        ORDER BY followed_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
