//! Generated tweets and self-update texts.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{SelfUpdate, Tweet};

/// Tag stored for self-update tweets.
pub const SELF_UPDATE_TAG: &str = "Self-Update";

/// Tag stored when a headline tweet collided with a recent tweet.
pub const DUPLICATE_AVOIDED_TAG: &str = "Self-Update (Duplicate Avoided)";

/// Tag stored when headline selection or generation failed.
pub const FALLBACK_TAG: &str = "Self-Update (Fallback)";

/// Tag stored when publishing failed and a fresh self update was posted instead.
pub const POSTING_FAILURE_TAG: &str = "Self-Update (Posting Failure Fallback)";

/// Record a published tweet.
pub async fn insert_tweet(pool: &SqlitePool, headline: &str, text: &str, at: &str) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO tweets (headline, text, timestamp)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(headline)
    .bind(text)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Texts of the most recent tweets, newest first.
pub async fn recent_tweet_texts(pool: &SqlitePool, limit: i64) -> Result<Vec<String>> {
    let rows: Vec<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT text
        FROM tweets
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(|(text,)| text).collect())
}

/// Most recent tweets, newest first.
pub async fn list_recent_tweets(pool: &SqlitePool, limit: i64) -> Result<Vec<Tweet>> {
    let rows = sqlx::query_as::<_, Tweet>(
        r#"
        SELECT id, headline, text, timestamp
        FROM tweets
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Record a self-update text unless it already exists.
///
/// Returns `true` if a new row was written.
pub async fn insert_self_update(pool: &SqlitePool, text: &str, at: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO self_updates (text, timestamp)
        VALUES (?, ?)
        "#,
    )
    .bind(text)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Most recent self-update texts, newest first.
pub async fn recent_self_updates(pool: &SqlitePool, limit: i64) -> Result<Vec<String>> {
    let rows = sqlx::query_as::<_, SelfUpdate>(
        r#"
        SELECT id, text, timestamp
        FROM self_updates
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.text).collect())
}
