//! Recording fakes for the orchestrator's collaborators.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brain_core::{Brain, BrainError, ProviderKind};
use headline_fetcher::FetchError;
use mock_brain::ScriptedBrain;
use orchestrator::{
    AccountCandidate, ActionContext, BrainFactory, ContentCache, Frontend, HeadlineSource, Pacing,
    Personality, Platform, PlatformError, PostCandidate, QuotaLedger, SearchTarget,
    SessionFactory, SessionSettings, SettingsOutcome, SetupChoice,
};
use xbot_database::{Credential, Database};

// ============================================================================
// Platform
// ============================================================================

#[derive(Debug, Default)]
pub struct PlatformState {
    pub calls: Vec<String>,
    pub published: Vec<String>,
    pub replies: Vec<String>,
    pub followed: Vec<String>,
    pub liked: Vec<String>,
    pub posts: Vec<PostCandidate>,
    pub accounts: Vec<AccountCandidate>,
    /// Post handles whose replies are restricted.
    pub restricted: HashSet<String>,
    /// Publish attempts that fail before one succeeds.
    pub publish_failures: u32,
    pub login_fails: bool,
    /// Post listings that fail with a lost connection.
    pub connection_drops: u32,
    pub height: u64,
    pub closed: u32,
}

/// A platform that records every call. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakePlatform {
    pub state: Arc<Mutex<PlatformState>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(self, posts: Vec<PostCandidate>) -> Self {
        self.state.lock().unwrap().posts = posts;
        self
    }

    pub fn with_accounts(self, accounts: Vec<AccountCandidate>) -> Self {
        self.state.lock().unwrap().accounts = accounts;
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    pub fn count(&self, call: &str) -> usize {
        self.state().calls.iter().filter(|c| c.as_str() == call).count()
    }
}

pub fn post(handle: &str, id: &str, author: &str, text: &str) -> PostCandidate {
    PostCandidate {
        handle: handle.to_string(),
        post_id: Some(id.to_string()),
        author: Some(author.to_string()),
        text: text.to_string(),
        liked: false,
    }
}

pub fn account(handle: &str, username: &str) -> AccountCandidate {
    AccountCandidate {
        handle: handle.to_string(),
        username: Some(username.to_string()),
        already_following: false,
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn login(&self, _username: &str, _password: &str, _email: &str) -> Result<(), PlatformError> {
        self.record("login");
        if self.state().login_fails {
            return Err(PlatformError::Timeout("primary column".into()));
        }
        Ok(())
    }

    async fn refresh(&self) -> Result<(), PlatformError> {
        self.record("refresh");
        Ok(())
    }

    async fn publish(&self, text: &str) -> Result<(), PlatformError> {
        self.record("publish");
        let mut state = self.state();
        if state.publish_failures > 0 {
            state.publish_failures -= 1;
            return Err(PlatformError::ElementNotFound("tweet textarea".into()));
        }
        state.published.push(text.to_string());
        Ok(())
    }

    async fn search(&self, query: &str, _target: SearchTarget) -> Result<(), PlatformError> {
        self.record(format!("search:{}", query));
        Ok(())
    }

    async fn visible_accounts(&self) -> Result<Vec<AccountCandidate>, PlatformError> {
        self.record("accounts");
        Ok(self.state().accounts.clone())
    }

    async fn follow(&self, account: &AccountCandidate) -> Result<(), PlatformError> {
        self.record("follow");
        self.state()
            .followed
            .push(account.username.clone().unwrap_or_default());
        Ok(())
    }

    async fn visible_posts(&self) -> Result<Vec<PostCandidate>, PlatformError> {
        self.record("posts");
        let mut state = self.state();
        if state.connection_drops > 0 {
            state.connection_drops -= 1;
            return Err(PlatformError::Connection("chromedriver went away".into()));
        }
        Ok(state.posts.clone())
    }

    async fn like(&self, post: &PostCandidate) -> Result<(), PlatformError> {
        self.record("like");
        self.state().liked.push(post.handle.clone());
        Ok(())
    }

    async fn open_reply(&self, post: &PostCandidate) -> Result<bool, PlatformError> {
        self.record("open_reply");
        Ok(!self.state().restricted.contains(&post.handle))
    }

    async fn submit_reply(&self, text: &str) -> Result<(), PlatformError> {
        self.record("submit_reply");
        self.state().replies.push(text.to_string());
        Ok(())
    }

    async fn scroll(&self) -> Result<u64, PlatformError> {
        self.record("scroll");
        Ok(self.state().height)
    }

    async fn page_height(&self) -> Result<u64, PlatformError> {
        Ok(self.state().height)
    }

    async fn close(&self) {
        self.record("close");
        self.state().closed += 1;
    }
}

/// Hands out the same shared fake platform for every session.
#[derive(Debug, Clone, Default)]
pub struct FakeSessions {
    pub platform: FakePlatform,
    pub opened: Arc<Mutex<Vec<bool>>>,
}

impl FakeSessions {
    pub fn new(platform: FakePlatform) -> Self {
        Self {
            platform,
            opened: Arc::default(),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionFactory for FakeSessions {
    async fn open(&self, headless: bool) -> Result<Box<dyn Platform>, PlatformError> {
        self.opened.lock().unwrap().push(headless);
        Ok(Box::new(self.platform.clone()))
    }
}

// ============================================================================
// Frontend
// ============================================================================

/// Replays scripted choices; shuts down once a script runs dry.
#[derive(Debug, Default)]
pub struct FakeFrontend {
    setups: Mutex<VecDeque<SetupChoice>>,
    settings: Mutex<VecDeque<SettingsOutcome>>,
    pub errors: Mutex<Vec<String>>,
}

impl FakeFrontend {
    pub fn new(setups: Vec<SetupChoice>, settings: Vec<SettingsOutcome>) -> Self {
        Self {
            setups: Mutex::new(setups.into()),
            settings: Mutex::new(settings.into()),
            errors: Mutex::default(),
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Frontend for FakeFrontend {
    async fn choose_setup(&self) -> SetupChoice {
        self.setups
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SetupChoice::Shutdown)
    }

    async fn edit_settings(&self, _credential: &Credential) -> SettingsOutcome {
        self.settings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SettingsOutcome::Shutdown)
    }

    async fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

// ============================================================================
// Headline source and providers
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeSource {
    pub headlines: HashMap<String, Vec<String>>,
}

impl FakeSource {
    pub fn with(source: &str, headlines: Vec<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(source.to_string(), headlines);
        Self { headlines: map }
    }
}

#[async_trait]
impl HeadlineSource for FakeSource {
    async fn fetch(&self, source: &str) -> Result<Vec<String>, FetchError> {
        self.headlines
            .get(source)
            .cloned()
            .ok_or_else(|| FetchError::Exhausted {
                url: source.to_string(),
                attempts: 3,
                last_error: "unreachable".to_string(),
            })
    }
}

/// Returns the same scripted brain for every provider.
pub struct FakeBrains {
    pub brain: Arc<ScriptedBrain>,
}

impl BrainFactory for FakeBrains {
    fn create(&self, _provider: ProviderKind, _api_key: &str) -> Result<Arc<dyn Brain>, BrainError> {
        let brain: Arc<dyn Brain> = self.brain.clone();
        Ok(brain)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub async fn test_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    db
}

pub fn settings(personality: Personality) -> SessionSettings {
    SessionSettings {
        username: "newsbot".to_string(),
        password: "hunter2".to_string(),
        email: "bot@example.com".to_string(),
        provider: ProviderKind::OpenAi,
        api_key: "sk-test".to_string(),
        personality,
    }
}

/// Everything an executor needs, owned in one place.
pub struct Harness {
    pub db: Database,
    pub quotas: QuotaLedger,
    pub cache: ContentCache,
    pub platform: FakePlatform,
    pub brain: ScriptedBrain,
    pub source: FakeSource,
    pub settings: SessionSettings,
}

impl Harness {
    pub async fn new(platform: FakePlatform, brain: ScriptedBrain, personality: Personality) -> Self {
        let db = test_db().await;
        Self {
            quotas: QuotaLedger::new(db.clone()),
            cache: ContentCache::new(db.clone()),
            db,
            platform,
            brain,
            source: FakeSource::default(),
            settings: settings(personality),
        }
    }

    pub fn ctx(&self) -> ActionContext<'_> {
        ActionContext {
            platform: &self.platform,
            brain: &self.brain,
            source: &self.source,
            quotas: &self.quotas,
            cache: &self.cache,
            settings: &self.settings,
            pacing: Pacing::Instant,
        }
    }
}
