//! Headline storage and deduplication.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Headline;

/// Check whether a headline text is already stored (exact match).
pub async fn headline_exists(pool: &SqlitePool, headline: &str) -> Result<bool> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM headlines
        WHERE headline = ?
        "#,
    )
    .bind(headline)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Insert a headline unless it already exists.
///
/// Returns `true` if a new row was written.
pub async fn insert_headline(
    pool: &SqlitePool,
    headline: &str,
    source_url: &str,
    run_number: i64,
    at: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO headlines (headline, source_url, run_number, timestamp, posted)
        VALUES (?, ?, ?, ?, 0)
        "#,
    )
    .bind(headline)
    .bind(source_url)
    .bind(run_number)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert a batch of headlines from one source.
///
/// Returns the number of rows actually written.
pub async fn save_headlines(
    pool: &SqlitePool,
    headlines: &[String],
    source_url: &str,
    run_number: i64,
    at: &str,
) -> Result<usize> {
    let mut saved = 0;
    for headline in headlines {
        if insert_headline(pool, headline, source_url, run_number, at).await? {
            saved += 1;
        }
    }
    Ok(saved)
}

/// Unposted headline texts, newest first.
pub async fn unused_headlines(pool: &SqlitePool, limit: i64) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT headline
        FROM headlines
        WHERE posted = 0
        ORDER BY timestamp DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(headline,)| headline).collect())
}

/// Flag a headline as used in a published tweet.
pub async fn mark_posted(pool: &SqlitePool, headline: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE headlines
        SET posted = 1
        WHERE headline = ?
        "#,
    )
    .bind(headline)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a stored headline by text.
pub async fn get_headline(pool: &SqlitePool, headline: &str) -> Result<Option<Headline>> {
    let record = sqlx::query_as::<_, Headline>(
        r#"
        SELECT id, headline, source_url, run_number, timestamp, posted
        FROM headlines
        WHERE headline = ?
        "#,
    )
    .bind(headline)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Total number of stored headlines.
pub async fn count_headlines(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM headlines
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
