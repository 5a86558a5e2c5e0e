//! Liked posts.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::LikedPost;

/// Check whether a post has already been liked.
pub async fn is_liked(pool: &SqlitePool, post_id: &str) -> Result<bool> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM likes
        WHERE post_id = ?
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Record a like unless the post is already stored.
///
/// Returns `true` if a new row was written.
pub async fn record_like(pool: &SqlitePool, post_id: &str, at: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO likes (post_id, liked_at)
        VALUES (?, ?)
        "#,
    )
    .bind(post_id)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// List liked posts, most recent first.
pub async fn list_likes(pool: &SqlitePool, limit: i64) -> Result<Vec<LikedPost>> {
    let rows = sqlx::query_as::<_, LikedPost>(
        r#"
        SELECT id, post_id, liked_at
        FROM likes
        ORDER BY liked_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
