//! Singleton counter of headline-fetch runs.

use sqlx::SqlitePool;

use crate::error::Result;

/// Increment the run counter and return the new value.
pub async fn increment(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO run_counter (id, count)
        VALUES (1, 1)
        ON CONFLICT(id) DO UPDATE SET count = count + 1
        RETURNING count
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Current run counter value.
pub async fn current(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT count
        FROM run_counter
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(count,)| count).unwrap_or(0))
}
