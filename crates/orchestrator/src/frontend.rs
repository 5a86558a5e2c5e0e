//! Setup and settings choices presented to the operator.

use async_trait::async_trait;
use brain_core::ProviderKind;
use xbot_database::Credential;

use crate::settings::SessionSettings;

/// Fields collected when registering a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub provider: ProviderKind,
    pub api_key: String,
}

/// Result of the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupChoice {
    SignIn { username: String, password: String },
    SignUp(SignUpForm),
    Shutdown,
}

/// Result of the settings screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsOutcome {
    /// Start a session with the resolved bundle.
    Start(SessionSettings),
    /// Back to setup.
    Logout,
    Shutdown,
}

/// Operator interaction. Every call returns an explicit outcome.
#[async_trait]
pub trait Frontend: Send + Sync {
    /// Ask how to proceed at the setup screen.
    async fn choose_setup(&self) -> SetupChoice;

    /// Collect session settings for a loaded credential.
    async fn edit_settings(&self, credential: &Credential) -> SettingsOutcome;

    /// Report a problem to the operator.
    async fn show_error(&self, message: &str);
}
