//! Named provider keys per account.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::ApiKey;
use crate::timestamp;

/// Add a named key. Fails with `AlreadyExists` if the account already has a key with that name.
pub async fn add_api_key(
    pool: &SqlitePool,
    username: &str,
    custom_name: &str,
    api_type: &str,
    api_key: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO api_keys (username, custom_name, api_type, api_key, last_updated)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(custom_name)
    .bind(api_type)
    .bind(api_key)
    .bind(timestamp::now())
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_conflict(e, "ApiKey", &format!("{}/{}", username, custom_name)))?;

    Ok(())
}

/// Get a named key for an account.
pub async fn get_api_key(pool: &SqlitePool, username: &str, custom_name: &str) -> Result<ApiKey> {
    sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, username, custom_name, api_type, api_key, last_updated
        FROM api_keys
        WHERE username = ? AND custom_name = ?
        "#,
    )
    .bind(username)
    .bind(custom_name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ApiKey",
        id: format!("{}/{}", username, custom_name),
    })
}

/// List the keys of an account ordered by name.
pub async fn list_api_keys(pool: &SqlitePool, username: &str) -> Result<Vec<ApiKey>> {
    let keys = sqlx::query_as::<_, ApiKey>(
        r#"
        SELECT id, username, custom_name, api_type, api_key, last_updated
        FROM api_keys
        WHERE username = ?
        ORDER BY custom_name
        "#,
    )
    .bind(username)
    .fetch_all(pool)
    .await?;

    Ok(keys)
}

/// Delete a named key.
pub async fn delete_api_key(pool: &SqlitePool, username: &str, custom_name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM api_keys
        WHERE username = ? AND custom_name = ?
        "#,
    )
    .bind(username)
    .bind(custom_name)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "ApiKey",
            id: format!("{}/{}", username, custom_name),
        });
    }

    Ok(())
}
