//! Session settings: account credentials plus the personality document.

use brain_core::ProviderKind;
use serde::{Deserialize, Serialize};
use xbot_database::validation::{validate_clock_time, validate_required};
use xbot_database::{ActionType, Credential, ValidationError};

use crate::error::OrchestratorError;

/// Personality and behaviour settings, stored as a JSON preset.
///
/// Every field has a default so partial presets load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    /// Preset name, used to pick preset-specific fallbacks.
    pub personality_preset: String,
    pub personality_description: String,
    pub tone_keywords: Vec<String>,
    pub custom_phrases: Vec<String>,
    pub self_update_topics: Vec<String>,
    pub search_keywords: Vec<String>,
    pub follow_keywords: Vec<String>,
    /// Headline source URLs.
    pub content_sources: Vec<String>,
    pub hashtags: Vec<String>,
    pub emoji_list: Vec<String>,
    /// Percent chance of a headline tweet over a self update.
    pub tweet_type_ratio: u32,

    pub post_enabled: bool,
    pub follow_enabled: bool,
    pub like_enabled: bool,
    pub comment_enabled: bool,
    pub research_enabled: bool,
    pub headless_enabled: bool,

    /// Daily caps, 0 for unlimited.
    pub daily_post_limit: u32,
    pub daily_follow_limit: u32,
    pub daily_like_limit: u32,
    pub daily_comment_limit: u32,

    /// Cycles per session.
    pub loop_count: u32,
    /// Minutes between cycles.
    pub schedule_interval: u64,

    pub use_emojis: bool,
    /// Percent chance of an emoji in generated text.
    pub emoji_frequency: u32,
    pub language: String,
    pub autodetect_language: bool,
    /// Preferred `HH:MM` posting times.
    pub posting_times: Vec<String>,
    /// Scroll budget for search-driven actions.
    pub scroll_attempts: u32,
}

impl Default for Personality {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            personality_preset: "default".to_string(),
            personality_description: "A neutral AI sharing updates.".to_string(),
            tone_keywords: strings(&["casual", "friendly"]),
            custom_phrases: strings(&["Check this out!", "Cool stuff!"]),
            self_update_topics: strings(&["daily life", "interests"]),
            search_keywords: strings(&["news", "tech"]),
            follow_keywords: Vec::new(),
            content_sources: Vec::new(),
            hashtags: Vec::new(),
            emoji_list: strings(&["😊", "👍"]),
            tweet_type_ratio: 50,
            post_enabled: true,
            follow_enabled: true,
            like_enabled: true,
            comment_enabled: true,
            research_enabled: true,
            headless_enabled: false,
            daily_post_limit: 5,
            daily_follow_limit: 10,
            daily_like_limit: 20,
            daily_comment_limit: 10,
            loop_count: 5,
            schedule_interval: 60,
            use_emojis: true,
            emoji_frequency: 50,
            language: "English".to_string(),
            autodetect_language: false,
            posting_times: Vec::new(),
            scroll_attempts: 5,
        }
    }
}

impl Personality {
    /// Parse a stored preset document.
    pub fn from_json(json: &str) -> Result<Self, OrchestratorError> {
        serde_json::from_str(json)
            .map_err(|e| OrchestratorError::InvalidSettings(format!("bad preset JSON: {}", e)))
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> Result<String, OrchestratorError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| OrchestratorError::InvalidSettings(e.to_string()))
    }

    /// Daily cap for an action type.
    pub fn daily_limit(&self, action: ActionType) -> u32 {
        match action {
            ActionType::Post => self.daily_post_limit,
            ActionType::Follow => self.daily_follow_limit,
            ActionType::Like => self.daily_like_limit,
            ActionType::Comment => self.daily_comment_limit,
        }
    }
}

/// Everything a logged-in session needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub username: String,
    pub password: String,
    /// Email or phone for the identity challenge.
    pub email: String,
    pub provider: ProviderKind,
    pub api_key: String,
    pub personality: Personality,
}

impl SessionSettings {
    /// Combine a stored credential with a personality.
    ///
    /// A credential without an `api_type` defaults to OpenAI.
    pub fn from_credential(
        credential: &Credential,
        personality: Personality,
    ) -> Result<Self, OrchestratorError> {
        let provider = match credential.api_type.as_deref() {
            Some(api_type) => api_type
                .parse()
                .map_err(|e| OrchestratorError::InvalidSettings(format!("{}", e)))?,
            None => ProviderKind::OpenAi,
        };

        Ok(Self {
            username: credential.username.clone(),
            password: credential.password.clone(),
            email: credential.email.clone(),
            provider,
            api_key: credential.api_key.clone().unwrap_or_default(),
            personality,
        })
    }

    /// Check the bundle before a session starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("username", &self.username)?;
        validate_required("password", &self.password)?;
        validate_required("email", &self.email)?;
        validate_required("api_key", &self.api_key)?;
        validate_required(
            "personality_description",
            &self.personality.personality_description,
        )?;

        if self
            .personality
            .search_keywords
            .iter()
            .all(|k| k.trim().is_empty())
        {
            return Err(ValidationError::Empty("search_keywords".to_string()));
        }

        if self.personality.loop_count == 0 {
            return Err(ValidationError::Empty("loop_count".to_string()));
        }

        for time in &self.personality.posting_times {
            validate_clock_time(time)?;
        }

        Ok(())
    }
}
