//! Posted replies and the legacy `comments` table upgrade.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;
use crate::models::Comment;

/// Constraint text that marks an up-to-date `comments` table.
const UNIQUE_CONSTRAINT: &str = "UNIQUE(post_id, comment_text)";

/// Check whether the bot has already replied to a post.
pub async fn has_commented(pool: &SqlitePool, post_id: &str) -> Result<bool> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM comments
        WHERE post_id = ?
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}

/// Record a reply unless the same text was already posted on that post.
///
/// Returns `true` if a new row was written.
pub async fn record_comment(
    pool: &SqlitePool,
    post_id: &str,
    username: &str,
    comment_text: &str,
    at: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO comments (post_id, username, comment_text, commented_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(post_id)
    .bind(username)
    .bind(comment_text)
    .bind(at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Most recent reply texts, newest first.
pub async fn recent_comments(pool: &SqlitePool, limit: i64) -> Result<Vec<String>> {
    let rows: Vec<(Option<String>,)> = sqlx::query_as(
        r#"
        SELECT comment_text
        FROM comments
        ORDER BY commented_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(|(text,)| text).collect())
}

/// List replies on a post.
pub async fn list_comments_for_post(pool: &SqlitePool, post_id: &str) -> Result<Vec<Comment>> {
    let rows = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, username, comment_text, commented_at
        FROM comments
        WHERE post_id = ?
        ORDER BY id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Bring a `comments` table created by older releases up to the current shape.
///
/// Adds the `username` column when missing, then rebuilds the table when its
/// definition lacks the `(post_id, comment_text)` uniqueness constraint.
/// Rows are copied by id; duplicate `(post_id, comment_text)` pairs keep the
/// first row.
pub async fn upgrade_legacy_table(pool: &SqlitePool) -> Result<bool> {
    let columns: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT name
        FROM pragma_table_info('comments')
        "#,
    )
    .fetch_all(pool)
    .await?;

    if columns.is_empty() {
        return Ok(false);
    }

    let mut upgraded = false;

    if !columns.iter().any(|(name,)| name == "username") {
        info!("Adding username column to comments table");
        sqlx::query("ALTER TABLE comments ADD COLUMN username TEXT")
            .execute(pool)
            .await?;
        upgraded = true;
    }

    let (create_sql,): (String,) = sqlx::query_as(
        r#"
        SELECT sql
        FROM sqlite_master
        WHERE type = 'table' AND name = 'comments'
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !create_sql.contains(UNIQUE_CONSTRAINT) {
        info!("Rebuilding comments table with unique (post_id, comment_text)");
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE comments_new (
                id INTEGER PRIMARY KEY,
                post_id TEXT,
                username TEXT,
                comment_text TEXT,
                commented_at TEXT,
                UNIQUE(post_id, comment_text)
            )
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO comments_new (id, post_id, username, comment_text, commented_at)
            SELECT id, post_id, username, comment_text, commented_at
            FROM comments
            ORDER BY id
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("DROP TABLE comments").execute(&mut *tx).await?;
        sqlx::query("ALTER TABLE comments_new RENAME TO comments")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        upgraded = true;
    }

    Ok(upgraded)
}
