//! Personality preset storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::PersonalityPreset;
use crate::timestamp;

/// Save a preset, overwriting any preset with the same name.
pub async fn save_preset(pool: &SqlitePool, preset_name: &str, settings: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO personalities (preset_name, settings, last_updated)
        VALUES (?, ?, ?)
        ON CONFLICT(preset_name) DO UPDATE SET
            settings = excluded.settings,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(preset_name)
    .bind(settings)
    .bind(timestamp::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a preset by name.
pub async fn get_preset(pool: &SqlitePool, preset_name: &str) -> Result<PersonalityPreset> {
    sqlx::query_as::<_, PersonalityPreset>(
        r#"
        SELECT preset_name, settings, last_updated
        FROM personalities
        WHERE preset_name = ?
        "#,
    )
    .bind(preset_name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "PersonalityPreset",
        id: preset_name.to_string(),
    })
}

/// List all presets ordered by name.
pub async fn list_presets(pool: &SqlitePool) -> Result<Vec<PersonalityPreset>> {
    let presets = sqlx::query_as::<_, PersonalityPreset>(
        r#"
        SELECT preset_name, settings, last_updated
        FROM personalities
        ORDER BY preset_name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(presets)
}

/// Delete a preset by name.
pub async fn delete_preset(pool: &SqlitePool, preset_name: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM personalities
        WHERE preset_name = ?
        "#,
    )
    .bind(preset_name)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "PersonalityPreset",
            id: preset_name.to_string(),
        });
    }

    Ok(())
}
