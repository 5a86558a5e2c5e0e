//! Preset and provider-key management.

use std::fs;
use std::path::Path;

use brain_core::ProviderKind;
use orchestrator::Personality;
use tracing::info;
use xbot_database::validation::validate_required;
use xbot_database::{api_key, credential, follow, like, personality, Database};

type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Store a personality JSON file under `name`, overwriting an existing preset.
pub async fn save_preset(db: &Database, name: &str, file: &Path) -> CommandResult<()> {
    validate_required("preset name", name)?;

    let raw = fs::read_to_string(file)?;
    let mut loaded = Personality::from_json(&raw)?;
    loaded.personality_preset = name.to_string();

    personality::save_preset(db.pool(), name, &loaded.to_json()?).await?;
    info!("Saved preset '{}' from {}", name, file.display());
    println!("Saved preset '{}'", name);
    Ok(())
}

pub async fn list_presets(db: &Database) -> CommandResult<()> {
    let presets = personality::list_presets(db.pool()).await?;
    if presets.is_empty() {
        println!("No presets stored");
    }
    for preset in presets {
        println!("{}\t{}", preset.preset_name, preset.last_updated);
    }
    Ok(())
}

pub async fn show_preset(db: &Database, name: &str) -> CommandResult<()> {
    let preset = personality::get_preset(db.pool(), name).await?;
    let loaded = Personality::from_json(&preset.settings)?;
    println!("{}", serde_json::to_string_pretty(&loaded)?);
    Ok(())
}

pub async fn delete_preset(db: &Database, name: &str) -> CommandResult<()> {
    personality::delete_preset(db.pool(), name).await?;
    println!("Deleted preset '{}'", name);
    Ok(())
}

/// Load a stored preset, or the built-in defaults when none is named.
pub async fn load_personality(db: &Database, name: Option<&str>) -> CommandResult<Personality> {
    match name {
        Some(name) => {
            let preset = personality::get_preset(db.pool(), name).await?;
            info!("Loaded preset '{}'", name);
            Ok(Personality::from_json(&preset.settings)?)
        }
        None => Ok(Personality::default()),
    }
}

pub async fn add_api_key(
    db: &Database,
    username: &str,
    name: &str,
    provider: ProviderKind,
    key: &str,
) -> CommandResult<()> {
    validate_required("key name", name)?;
    validate_required("api_key", key)?;
    credential::get_credential(db.pool(), username).await?;

    api_key::add_api_key(db.pool(), username, name.trim(), provider.as_str(), key.trim()).await?;
    println!(
        "Added {} key '{}' for {}",
        provider.display_name(),
        name.trim(),
        username
    );
    Ok(())
}

pub async fn list_api_keys(db: &Database, username: &str) -> CommandResult<()> {
    let keys = api_key::list_api_keys(db.pool(), username).await?;
    if keys.is_empty() {
        println!("No keys stored for {}", username);
    }
    for key in keys {
        println!("{}\t{}\t{}", key.custom_name, key.api_type, mask_key(&key.api_key));
    }
    Ok(())
}

pub async fn delete_api_key(db: &Database, username: &str, name: &str) -> CommandResult<()> {
    api_key::delete_api_key(db.pool(), username, name).await?;
    println!("Deleted key '{}' for {}", name, username);
    Ok(())
}

/// Provider and secret of a named key.
pub async fn load_api_key(
    db: &Database,
    username: &str,
    name: &str,
) -> CommandResult<(ProviderKind, String)> {
    let stored = api_key::get_api_key(db.pool(), username, name).await?;
    let provider: ProviderKind = stored.api_type.parse()?;
    Ok((provider, stored.api_key))
}

pub async fn list_accounts(db: &Database) -> CommandResult<()> {
    let usernames = credential::list_usernames(db.pool()).await?;
    if usernames.is_empty() {
        println!("No accounts stored. Create one with `xbot signup`.");
    }
    for username in usernames {
        println!("{}", username);
    }
    Ok(())
}

/// Followed accounts, newest first, as printable lines.
pub async fn follow_history(db: &Database, limit: i64) -> CommandResult<Vec<String>> {
    let rows = follow::list_followed(db.pool(), limit).await?;
    Ok(rows
        .into_iter()
        .map(|row| format!("{}\t{}", row.followed_at.unwrap_or_default(), row.username))
        .collect())
}

/// Liked posts, newest first, as printable lines.
pub async fn like_history(db: &Database, limit: i64) -> CommandResult<Vec<String>> {
    let rows = like::list_likes(db.pool(), limit).await?;
    Ok(rows
        .into_iter()
        .map(|row| format!("{}\t{}", row.liked_at.unwrap_or_default(), row.post_id))
        .collect())
}

/// Show only the last four characters of a secret.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
