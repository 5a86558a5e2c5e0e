//! Session supervisor: setup, login, the cycle loop and recovery.
//!
//! ```text
//! AwaitingSetup ──SignIn/SignUp──▶ Settings ──Start──▶ LoggedIn ──cycles done──┐
//!      ▲  │                          │  │                  │                   │
//!      │  └──Shutdown──▶ ShuttingDown ◀─┘  └──Logout──▶ AwaitingSetup          │
//!      └────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use brain_core::Brain;
use tracing::{error, info, warn};
use xbot_database::validation::{validate_contact, validate_required, validate_username};
use xbot_database::{api_key, credential, Credential, Database, DatabaseError};

use crate::actions::ActionContext;
use crate::brains::BrainFactory;
use crate::cache::ContentCache;
use crate::cycle::run_cycle;
use crate::error::OrchestratorError;
use crate::frontend::{Frontend, SettingsOutcome, SetupChoice, SignUpForm};
use crate::pacing::Pacing;
use crate::platform::{Platform, SessionFactory};
use crate::quota::QuotaLedger;
use crate::retry::{retry, Outcome, RetryPolicy};
use crate::settings::SessionSettings;
use crate::source::HeadlineSource;

/// Supervisor tuning.
#[derive(Debug, Clone, Copy)]
pub struct SupervisorConfig {
    pub login_policy: RetryPolicy,
    /// Pause after a failed cycle.
    pub error_pause: Duration,
    pub pacing: Pacing,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            login_policy: RetryPolicy::login(),
            error_pause: Duration::from_secs(10),
            pacing: Pacing::Human,
        }
    }
}

/// A logged-in browser session with its settings and provider.
pub struct ActiveSession {
    platform: Box<dyn Platform>,
    settings: SessionSettings,
    brain: Arc<dyn Brain>,
    closed: bool,
}

impl ActiveSession {
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Close the browser once.
    async fn close(&mut self) {
        if !self.closed {
            self.platform.close().await;
            self.closed = true;
        }
    }
}

/// Result of the setup and settings screens.
pub enum Established {
    Session(ActiveSession),
    Logout,
    Shutdown,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// All cycles ran, or the session was abandoned after an error.
    Completed,
    Logout,
    Shutdown,
}

/// Owns the browser session lifecycle and the outer loop.
pub struct Supervisor<F: Frontend, S: SessionFactory> {
    db: Database,
    quotas: QuotaLedger,
    cache: ContentCache,
    frontend: F,
    sessions: S,
    brains: Arc<dyn BrainFactory>,
    source: Arc<dyn HeadlineSource>,
    config: SupervisorConfig,
}

impl<F: Frontend, S: SessionFactory> Supervisor<F, S> {
    pub fn new(
        db: Database,
        frontend: F,
        sessions: S,
        brains: Arc<dyn BrainFactory>,
        source: Arc<dyn HeadlineSource>,
    ) -> Self {
        Self {
            quotas: QuotaLedger::new(db.clone()),
            cache: ContentCache::new(db.clone()),
            db,
            frontend,
            sessions,
            brains,
            source,
            config: SupervisorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Run until the operator shuts down.
    pub async fn run(&self) -> Result<(), OrchestratorError> {
        loop {
            info!("Bot started");
            let session = match self.establish_session().await {
                Ok(Established::Shutdown) => break,
                Ok(Established::Logout) => {
                    info!("Logged out, returning to setup");
                    continue;
                }
                Ok(Established::Session(session)) => session,
                Err(e) => {
                    error!("Setup failed: {}", e);
                    self.config.pacing.wait(self.config.error_pause).await;
                    continue;
                }
            };

            info!("Bot running");
            match self.run_session(session).await {
                SessionEnd::Shutdown => break,
                SessionEnd::Logout => info!("Logged out, returning to setup"),
                SessionEnd::Completed => info!("Closing browser and returning to setup"),
            }
        }

        info!("Shutting down bot gracefully");
        Ok(())
    }

    /// Present setup and settings until a session is logged in, or the
    /// operator logs out or shuts down.
    pub async fn establish_session(&self) -> Result<Established, OrchestratorError> {
        loop {
            let credential = match self.frontend.choose_setup().await {
                SetupChoice::Shutdown => {
                    info!("Shutdown requested from setup");
                    return Ok(Established::Shutdown);
                }
                SetupChoice::SignIn { username, password } => {
                    match self.sign_in(&username, &password).await? {
                        Some(credential) => credential,
                        None => continue,
                    }
                }
                SetupChoice::SignUp(form) => match self.sign_up(&form).await {
                    Ok(credential) => credential,
                    Err(OrchestratorError::Database(DatabaseError::AlreadyExists { .. })) => {
                        warn!("Sign-up rejected, '{}' already exists", form.username);
                        self.frontend
                            .show_error("Username already exists! Please sign in instead.")
                            .await;
                        continue;
                    }
                    Err(OrchestratorError::Validation(e)) => {
                        self.frontend.show_error(&e.to_string()).await;
                        continue;
                    }
                    Err(e) => {
                        error!("Sign-up failed: {}", e);
                        self.frontend
                            .show_error(&format!("Sign-up failed: {}. Please try again.", e))
                            .await;
                        continue;
                    }
                },
            };
            info!("Loaded credentials for '{}'", credential.username);

            let settings = match self.collect_settings(&credential).await {
                SettingsOutcome::Start(settings) => settings,
                SettingsOutcome::Logout => {
                    info!("Logout requested from settings");
                    return Ok(Established::Logout);
                }
                SettingsOutcome::Shutdown => {
                    info!("Shutdown requested from settings");
                    return Ok(Established::Shutdown);
                }
            };

            match self.login(settings).await {
                Ok(session) => {
                    info!("Logged in with username: {}", session.settings.username);
                    return Ok(Established::Session(session));
                }
                Err(e) => {
                    error!("Login attempt failed: {}", e);
                    self.frontend
                        .show_error(&format!("Login failed: {}. Please retry.", e))
                        .await;
                }
            }
        }
    }

    async fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Credential>, OrchestratorError> {
        match credential::get_credential(self.db.pool(), username).await {
            Ok(found) if found.password == password => Ok(Some(found)),
            Ok(_) => {
                warn!("Incorrect password for '{}'", username);
                self.frontend
                    .show_error("Incorrect password! Please try again.")
                    .await;
                Ok(None)
            }
            Err(DatabaseError::NotFound { .. }) => {
                warn!("Credentials for '{}' not found", username);
                self.frontend
                    .show_error("Credentials not found for this username! Please try again.")
                    .await;
                Ok(None)
            }
            Err(e) => {
                error!("Could not load credentials for '{}': {}", username, e);
                self.frontend
                    .show_error(&format!("Could not load credentials: {}. Please try again.", e))
                    .await;
                Ok(None)
            }
        }
    }

    /// Store a new credential and its first provider key.
    async fn sign_up(&self, form: &SignUpForm) -> Result<Credential, OrchestratorError> {
        validate_username(&form.username)?;
        validate_required("password", &form.password)?;
        validate_contact(&form.email)?;
        validate_required("api_key", &form.api_key)?;

        let pool = self.db.pool();
        let created = credential::create_credential(
            pool,
            form.username.trim(),
            &form.password,
            form.email.trim(),
            Some(form.provider.as_str()),
            Some(form.api_key.trim()),
        )
        .await?;
        api_key::add_api_key(
            pool,
            &created.username,
            &form.provider.default_key_name(),
            form.provider.as_str(),
            form.api_key.trim(),
        )
        .await?;

        info!("Signed up '{}' with {}", created.username, form.provider.display_name());
        Ok(created)
    }

    async fn collect_settings(&self, credential: &Credential) -> SettingsOutcome {
        loop {
            match self.frontend.edit_settings(credential).await {
                SettingsOutcome::Start(settings) => match settings.validate() {
                    Ok(()) => return SettingsOutcome::Start(settings),
                    Err(e) => self.frontend.show_error(&e.to_string()).await,
                },
                other => return other,
            }
        }
    }

    /// Open a browser and log in, closing it again when every attempt fails.
    pub async fn login(&self, settings: SessionSettings) -> Result<ActiveSession, OrchestratorError> {
        let brain = self.brains.create(settings.provider, &settings.api_key)?;
        let platform = self
            .sessions
            .open(settings.personality.headless_enabled)
            .await?;

        let policy = self.config.login_policy;
        let outcome = {
            let browser = platform.as_ref();
            let (username, password, email) = (
                settings.username.as_str(),
                settings.password.as_str(),
                settings.email.as_str(),
            );
            retry(policy, self.config.pacing, "Login", |attempt| async move {
                info!("Starting login attempt {} of {}", attempt, policy.max_attempts);
                if attempt > 1 {
                    browser.refresh().await?;
                }
                browser.login(username, password, email).await?;
                Ok(())
            })
            .await
        };

        match outcome {
            Outcome::Success(()) => Ok(ActiveSession {
                platform,
                settings,
                brain,
                closed: false,
            }),
            Outcome::Skip(e) | Outcome::Fatal(e) => {
                platform.close().await;
                Err(OrchestratorError::LoginFailed {
                    attempts: policy.max_attempts,
                    last_error: e.to_string(),
                })
            }
        }
    }

    /// Run `loop_count` cycles, rebuilding the session after connection loss.
    pub async fn run_session(&self, mut session: ActiveSession) -> SessionEnd {
        let end = match self.run_cycles(&mut session).await {
            Ok(end) => end,
            Err(e) => {
                error!("Main loop crashed unexpectedly: {}", e);
                session.close().await;
                self.config.pacing.wait(self.config.error_pause).await;
                return SessionEnd::Completed;
            }
        };

        session.close().await;
        end
    }

    async fn run_cycles(&self, session: &mut ActiveSession) -> Result<SessionEnd, OrchestratorError> {
        let pacing = self.config.pacing;
        let mut completed = 0;

        while completed < session.settings.personality.loop_count {
            let result = {
                let ctx = ActionContext {
                    platform: session.platform.as_ref(),
                    brain: session.brain.as_ref(),
                    source: self.source.as_ref(),
                    quotas: &self.quotas,
                    cache: &self.cache,
                    settings: &session.settings,
                    pacing,
                };
                run_cycle(&ctx).await
            };

            match result {
                Ok(report) => {
                    completed += 1;
                    let total = session.settings.personality.loop_count;
                    info!("Run {}/{} complete: {:?}", completed, total, report);
                    if completed < total {
                        let minutes = session.settings.personality.schedule_interval;
                        info!("Pausing for {} minutes before next run", minutes);
                        pacing.wait(Duration::from_secs(minutes * 60)).await;
                    }
                }
                Err(e) => {
                    error!("Loop iteration crashed: {}", e);
                    if e.is_connection() {
                        info!("Restarting browser due to connection error");
                        session.close().await;
                        match self.establish_session().await? {
                            Established::Shutdown => return Ok(SessionEnd::Shutdown),
                            Established::Logout => return Ok(SessionEnd::Logout),
                            Established::Session(fresh) => *session = fresh,
                        }
                    }
                    pacing.wait(self.config.error_pause).await;
                }
            }
        }

        info!("Completed {} run(s)", completed);
        Ok(SessionEnd::Completed)
    }
}
