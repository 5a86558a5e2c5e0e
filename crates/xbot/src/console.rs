//! Command-line frontend: answers the setup and settings screens from
//! arguments resolved before the supervisor starts.

use async_trait::async_trait;
use brain_core::ProviderKind;
use orchestrator::{Frontend, Personality, SessionSettings, SettingsOutcome, SetupChoice};
use tokio::sync::Mutex;
use tracing::{error, info};
use xbot_database::Credential;

/// Session overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SessionPlan {
    pub personality: Personality,
    /// Provider and key replacing the credential's default.
    pub api_key: Option<(ProviderKind, String)>,
    pub headless: Option<bool>,
    pub loop_count: Option<u32>,
    pub schedule_interval: Option<u64>,
}

/// Frontend that answers each screen once, then shuts down.
///
/// Without a [`SessionPlan`] the settings screen returns `Shutdown`, which
/// ends a sign-up run right after the account is stored.
pub struct ConsoleFrontend {
    setup: Mutex<Option<SetupChoice>>,
    plan: Mutex<Option<SessionPlan>>,
}

impl ConsoleFrontend {
    pub fn new(setup: SetupChoice, plan: Option<SessionPlan>) -> Self {
        Self {
            setup: Mutex::new(Some(setup)),
            plan: Mutex::new(plan),
        }
    }
}

/// Apply command-line overrides to the stored credential.
pub fn resolve_settings(
    credential: &Credential,
    plan: SessionPlan,
) -> Result<SessionSettings, orchestrator::OrchestratorError> {
    let mut settings = SessionSettings::from_credential(credential, plan.personality)?;

    if let Some((provider, key)) = plan.api_key {
        settings.provider = provider;
        settings.api_key = key;
    }
    if let Some(headless) = plan.headless {
        settings.personality.headless_enabled = headless;
    }
    if let Some(loops) = plan.loop_count {
        settings.personality.loop_count = loops;
    }
    if let Some(interval) = plan.schedule_interval {
        settings.personality.schedule_interval = interval;
    }

    Ok(settings)
}

#[async_trait]
impl Frontend for ConsoleFrontend {
    async fn choose_setup(&self) -> SetupChoice {
        self.setup.lock().await.take().unwrap_or(SetupChoice::Shutdown)
    }

    async fn edit_settings(&self, credential: &Credential) -> SettingsOutcome {
        let Some(plan) = self.plan.lock().await.take() else {
            info!("No session requested for '{}'", credential.username);
            return SettingsOutcome::Shutdown;
        };

        match resolve_settings(credential, plan) {
            Ok(settings) => SettingsOutcome::Start(settings),
            Err(e) => {
                error!("Could not resolve settings: {}", e);
                eprintln!("Error: {}", e);
                SettingsOutcome::Shutdown
            }
        }
    }

    async fn show_error(&self, message: &str) {
        error!("{}", message);
        eprintln!("Error: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential {
            username: "newsbot".to_string(),
            password: "hunter2".to_string(),
            email: "bot@example.com".to_string(),
            api_type: Some("openai".to_string()),
            api_key: Some("sk-stored".to_string()),
            last_updated: "2024-05-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_resolve_settings_applies_overrides() {
        let plan = SessionPlan {
            api_key: Some((ProviderKind::Gemini, "gm-key".to_string())),
            headless: Some(true),
            loop_count: Some(2),
            schedule_interval: Some(0),
            ..SessionPlan::default()
        };

        let settings = resolve_settings(&credential(), plan).unwrap();
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert_eq!(settings.api_key, "gm-key");
        assert!(settings.personality.headless_enabled);
        assert_eq!(settings.personality.loop_count, 2);
        assert_eq!(settings.personality.schedule_interval, 0);
    }

    #[test]
    fn test_resolve_settings_keeps_stored_key() {
        let settings = resolve_settings(&credential(), SessionPlan::default()).unwrap();
        assert_eq!(settings.provider, ProviderKind::OpenAi);
        assert_eq!(settings.api_key, "sk-stored");
    }

    #[tokio::test]
    async fn test_answers_once_then_shuts_down() {
        let frontend = ConsoleFrontend::new(
            SetupChoice::SignIn {
                username: "newsbot".to_string(),
                password: "hunter2".to_string(),
            },
            Some(SessionPlan::default()),
        );

        assert!(matches!(frontend.choose_setup().await, SetupChoice::SignIn { .. }));
        assert_eq!(frontend.choose_setup().await, SetupChoice::Shutdown);

        assert!(matches!(
            frontend.edit_settings(&credential()).await,
            SettingsOutcome::Start(_)
        ));
        assert!(matches!(
            frontend.edit_settings(&credential()).await,
            SettingsOutcome::Shutdown
        ));
    }

    #[tokio::test]
    async fn test_without_plan_settings_shut_down() {
        let frontend = ConsoleFrontend::new(SetupChoice::Shutdown, None);
        assert!(matches!(
            frontend.edit_settings(&credential()).await,
            SettingsOutcome::Shutdown
        ));
    }
}
