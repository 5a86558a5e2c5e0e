//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Login credentials for the automated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Credential {
    /// Account handle used at the login form.
    pub username: String,
    pub password: String,
    /// Email or phone answered at the identity challenge.
    pub email: String,
    /// Default generation provider ("openai" or "gemini").
    pub api_type: Option<String>,
    /// Default provider secret.
    pub api_key: Option<String>,
    /// Last update timestamp.
    pub last_updated: String,
}

/// A named personality preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PersonalityPreset {
    pub preset_name: String,
    /// JSON document with the personality settings.
    pub settings: String,
    pub last_updated: String,
}

/// A named provider key owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ApiKey {
    pub id: i64,
    pub username: String,
    /// Display name, unique per account.
    pub custom_name: String,
    pub api_type: String,
    pub api_key: String,
    pub last_updated: String,
}

/// A fetched headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Headline {
    pub id: i64,
    pub headline: String,
    pub source_url: Option<String>,
    /// Run counter value at fetch time.
    pub run_number: Option<i64>,
    pub timestamp: Option<String>,
    /// Whether a tweet has been published about this headline.
    pub posted: bool,
}

/// A generated tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tweet {
    pub id: i64,
    /// Headline text or a self-update tag.
    pub headline: Option<String>,
    pub text: Option<String>,
    pub timestamp: Option<String>,
}

/// A generated self-update text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SelfUpdate {
    pub id: i64,
    pub text: String,
    pub timestamp: Option<String>,
}

/// An account followed by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FollowedAccount {
    pub id: i64,
    pub username: String,
    pub followed_at: Option<String>,
}

/// A post liked by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LikedPost {
    pub id: i64,
    pub post_id: String,
    pub liked_at: Option<String>,
}

/// A reply posted by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: String,
    /// Author of the post that was replied to.
    pub username: Option<String>,
    pub comment_text: String,
    pub commented_at: Option<String>,
}

/// Action types subject to a daily quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Post,
    Follow,
    Like,
    Comment,
}

impl ActionType {
    /// All quota-tracked action types, in cycle order.
    pub const ALL: [ActionType; 4] = [
        ActionType::Post,
        ActionType::Follow,
        ActionType::Like,
        ActionType::Comment,
    ];

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Post => "post",
            ActionType::Follow => "follow",
            ActionType::Like => "like",
            ActionType::Comment => "comment",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(ActionType::Post),
            "follow" => Ok(ActionType::Follow),
            "like" => Ok(ActionType::Like),
            "comment" => Ok(ActionType::Comment),
            other => Err(format!("unknown action type: {}", other)),
        }
    }
}
