//! Credential storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Credential;
use crate::timestamp;

/// Create a new credential. Fails with `AlreadyExists` if the username is taken.
pub async fn create_credential(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    email: &str,
    api_type: Option<&str>,
    api_key: Option<&str>,
) -> Result<Credential> {
    let now = timestamp::now();

    sqlx::query(
        r#"
        INSERT INTO credentials (username, password, email, api_type, api_key, last_updated)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(password)
    .bind(email)
    .bind(api_type)
    .bind(api_key)
    .bind(&now)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_conflict(e, "Credential", username))?;

    Ok(Credential {
        username: username.to_string(),
        password: password.to_string(),
        email: email.to_string(),
        api_type: api_type.map(str::to_string),
        api_key: api_key.map(str::to_string),
        last_updated: now,
    })
}

/// Create or overwrite a credential.
pub async fn save_credential(pool: &SqlitePool, credential: &Credential) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO credentials (username, password, email, api_type, api_key, last_updated)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(username) DO UPDATE SET
            password = excluded.password,
            email = excluded.email,
            api_type = excluded.api_type,
            api_key = excluded.api_key,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(&credential.username)
    .bind(&credential.password)
    .bind(&credential.email)
    .bind(&credential.api_type)
    .bind(&credential.api_key)
    .bind(timestamp::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a credential by username.
pub async fn get_credential(pool: &SqlitePool, username: &str) -> Result<Credential> {
    sqlx::query_as::<_, Credential>(
        r#"
        SELECT username, password, email, api_type, api_key, last_updated
        FROM credentials
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Credential",
        id: username.to_string(),
    })
}

/// List all stored usernames.
pub async fn list_usernames(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT username
        FROM credentials
        ORDER BY username
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(username,)| username).collect())
}

/// Delete a credential by username.
pub async fn delete_credential(pool: &SqlitePool, username: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM credentials
        WHERE username = ?
        "#,
    )
    .bind(username)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Credential",
            id: username.to_string(),
        });
    }

    Ok(())
}
