//! Platform adapter driving the x.com web UI through chromedriver.

use std::time::Duration;

use async_trait::async_trait;
use orchestrator::{
    AccountCandidate, Platform, PlatformError, PostCandidate, SearchTarget, SessionFactory,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use webdriver::{
    spawn_and_connect, DriverConfig, DriverProcess, ElementRef, Locator, Session,
    WebDriverClient, WebDriverError, KEY_ENTER,
};

use crate::config::BotConfig;

const USERNAME_INPUT: &str = "//input[@autocomplete='username']";
const CHALLENGE_PROMPT: &str =
    "//*[contains(text(), 'phone number or email') or contains(text(), 'Phone or Email')]";
const CHALLENGE_INPUT: &str = "//input[@data-testid='ocfEnterTextTextInput']";
const PASSWORD_INPUT: &str = "//input[@autocomplete='current-password']";
const PRIMARY_COLUMN: &str = "//div[@data-testid='primaryColumn']";

const COMPOSE_BOX: &str = "//div[@data-testid='tweetTextarea_0']";
const COMPOSE_BUTTON: &str = "//button[@data-testid='tweetButtonInline']";
const POST_ARTICLE: &str = "//article[@data-testid='tweet']";

const REPLY_BUTTON: &str = ".//button[@data-testid='reply']";
const REPLY_BOX: &str = "//div[@data-testid='tweetTextarea_0' and @role='textbox']";
const REPLY_SEND: &str = "//button[@data-testid='tweetButton']";

const SEARCH_INPUT: &str = "//input[@placeholder='Search']";
const FOLLOW_BUTTON: &str = "//button[contains(@aria-label, 'Follow')]";
const ROW_HANDLE: &str = "../../..//span[starts-with(text(), '@')]";

const LIKE_BUTTON: &str = ".//button[@data-testid='like']";
const UNLIKE_BUTTON: &str = ".//button[@data-testid='unlike']";
const PERMALINK: &str = ".//a[@role='link' and .//time]";
const AUTHOR_HANDLE: &str = ".//span[starts-with(text(), '@')]";
const POST_TEXT: &str = ".//div[@lang]//span";

const CLICK_SCRIPT: &str = "arguments[0].click();";
const SCROLL_SCRIPT: &str = "window.scrollBy(0, 1000);";
const HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";

/// How long page elements are waited for.
#[derive(Debug, Clone, Copy)]
pub struct Waits {
    pub element: Duration,
    pub login: Duration,
    /// Pause after an action for the page to settle.
    pub settle: Duration,
}

impl Default for Waits {
    fn default() -> Self {
        Self {
            element: Duration::from_secs(10),
            login: Duration::from_secs(15),
            settle: Duration::from_secs(2),
        }
    }
}

/// Translate a driver failure into the platform vocabulary.
pub fn platform_error(e: WebDriverError) -> PlatformError {
    if e.is_connection() {
        return PlatformError::Connection(e.to_string());
    }
    match e {
        WebDriverError::NoSuchElement(msg) => PlatformError::ElementNotFound(msg),
        WebDriverError::StaleElement(msg) => PlatformError::StaleElement(msg),
        WebDriverError::ClickIntercepted(msg) => PlatformError::ClickIntercepted(msg),
        WebDriverError::Timeout(msg) => PlatformError::Timeout(msg),
        other => PlatformError::Other(other.to_string()),
    }
}

/// Status id from a permalink such as `/alice/status/123`.
pub fn status_id(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let (_, rest) = path.rsplit_once("/status/")?;
    let id = rest.split('/').next().unwrap_or(rest);
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
}

/// Whether a follow button's label shows an existing follow.
pub fn is_following_label(label: &str) -> bool {
    let label = label.trim();
    label.starts_with("Following") || label.starts_with("Unfollow")
}

/// Search results URL for the current page URL.
pub fn people_results_url(current: &str) -> String {
    if current.contains("f=user") {
        current.to_string()
    } else if current.contains('?') {
        format!("{}&f=user", current)
    } else {
        format!("{}?f=user", current)
    }
}

/// A logged-in browser window on the platform.
pub struct XPlatform {
    session: Session,
    base_url: String,
    waits: Waits,
    /// Driver spawned for this session, killed on close.
    process: Mutex<Option<DriverProcess>>,
}

impl XPlatform {
    pub fn new(session: Session, base_url: impl Into<String>, process: Option<DriverProcess>) -> Self {
        Self {
            session,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            waits: Waits::default(),
            process: Mutex::new(process),
        }
    }

    pub fn with_waits(mut self, waits: Waits) -> Self {
        self.waits = waits;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn settle(&self) {
        sleep(self.waits.settle).await;
    }

    async fn wait(&self, xpath: &str, timeout: Duration) -> Result<ElementRef, PlatformError> {
        self.session
            .wait_for(&Locator::xpath(xpath), timeout)
            .await
            .map_err(platform_error)
    }

    /// Click through script; overlays on the page intercept native clicks.
    async fn js_click(&self, element: &ElementRef) -> Result<(), PlatformError> {
        self.session
            .execute_script(CLICK_SCRIPT, vec![element.to_value()])
            .await
            .map(drop)
            .map_err(platform_error)
    }

    async fn type_line(&self, element: &ElementRef, text: &str) -> Result<(), PlatformError> {
        self.session
            .send_keys(element, text)
            .await
            .map_err(platform_error)?;
        self.session
            .send_keys(element, KEY_ENTER)
            .await
            .map_err(platform_error)
    }

    /// First matching descendant, `None` when absent.
    async fn child(
        &self,
        parent: &ElementRef,
        xpath: &str,
    ) -> Result<Option<ElementRef>, PlatformError> {
        match self
            .session
            .find_element_from(parent, &Locator::xpath(xpath))
            .await
        {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_missing_element() => Ok(None),
            Err(e) => Err(platform_error(e)),
        }
    }

    async fn child_text(&self, parent: &ElementRef, xpath: &str) -> Result<Option<String>, PlatformError> {
        match self.child(parent, xpath).await? {
            Some(element) => self
                .session
                .text(&element)
                .await
                .map(Some)
                .map_err(platform_error),
            None => Ok(None),
        }
    }

    async fn read_post(&self, article: ElementRef) -> Result<PostCandidate, PlatformError> {
        let post_id = match self.child(&article, PERMALINK).await? {
            Some(link) => self
                .session
                .attribute(&link, "href")
                .await
                .map_err(platform_error)?
                .as_deref()
                .and_then(status_id),
            None => None,
        };

        let author = self
            .child_text(&article, AUTHOR_HANDLE)
            .await?
            .map(|handle| handle.trim().trim_start_matches('@').to_string())
            .filter(|handle| !handle.is_empty());

        let text = self.child_text(&article, POST_TEXT).await?.unwrap_or_default();
        let liked = self.child(&article, UNLIKE_BUTTON).await?.is_some();

        Ok(PostCandidate {
            handle: article.id().to_string(),
            post_id,
            author,
            text,
            liked,
        })
    }
}

#[async_trait]
impl Platform for XPlatform {
    async fn login(&self, username: &str, password: &str, email: &str) -> Result<(), PlatformError> {
        info!("Opening login page");
        self.session
            .navigate(&self.url("/login"))
            .await
            .map_err(platform_error)?;

        let field = self.wait(USERNAME_INPUT, self.waits.element).await?;
        self.type_line(&field, username).await?;
        self.settle().await;

        let challenge = self
            .session
            .find_elements(&Locator::xpath(CHALLENGE_PROMPT))
            .await
            .map_err(platform_error)?;
        if !challenge.is_empty() {
            info!("Answering identity challenge");
            let field = self.wait(CHALLENGE_INPUT, self.waits.element).await?;
            self.type_line(&field, email).await?;
            self.settle().await;
        }

        let field = self.wait(PASSWORD_INPUT, self.waits.element).await?;
        self.type_line(&field, password).await?;

        self.wait(PRIMARY_COLUMN, self.waits.login).await?;
        info!("Home timeline loaded");
        Ok(())
    }

    async fn refresh(&self) -> Result<(), PlatformError> {
        self.session.refresh().await.map_err(platform_error)?;
        self.settle().await;
        Ok(())
    }

    async fn publish(&self, text: &str) -> Result<(), PlatformError> {
        self.session
            .navigate(&self.url("/home"))
            .await
            .map_err(platform_error)?;

        let compose = self.wait(COMPOSE_BOX, self.waits.element).await?;
        self.js_click(&compose).await?;
        self.session
            .send_keys(&compose, text)
            .await
            .map_err(platform_error)?;

        let button = self.wait(COMPOSE_BUTTON, self.waits.element).await?;
        self.js_click(&button).await?;
        self.settle().await;

        self.wait(POST_ARTICLE, self.waits.element).await?;
        debug!("Published {} chars", text.chars().count());
        Ok(())
    }

    async fn search(&self, query: &str, target: SearchTarget) -> Result<(), PlatformError> {
        self.session
            .navigate(&self.url("/explore"))
            .await
            .map_err(platform_error)?;

        let field = match self.wait(SEARCH_INPUT, self.waits.element).await {
            Ok(field) => field,
            Err(PlatformError::Timeout(_)) | Err(PlatformError::ElementNotFound(_)) => {
                warn!("Search bar not found, using the home timeline");
                self.session
                    .navigate(&self.url("/home"))
                    .await
                    .map_err(platform_error)?;
                self.settle().await;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.type_line(&field, query).await?;
        self.settle().await;

        if target == SearchTarget::Accounts {
            let current = self.session.current_url().await.map_err(platform_error)?;
            self.session
                .navigate(&people_results_url(&current))
                .await
                .map_err(platform_error)?;
            self.settle().await;
        }

        Ok(())
    }

    async fn visible_accounts(&self) -> Result<Vec<AccountCandidate>, PlatformError> {
        let buttons = self
            .session
            .find_elements(&Locator::xpath(FOLLOW_BUTTON))
            .await
            .map_err(platform_error)?;

        let mut accounts = Vec::with_capacity(buttons.len());
        for button in buttons {
            let label = self
                .session
                .attribute(&button, "aria-label")
                .await
                .map_err(platform_error)?
                .unwrap_or_default();
            let username = self
                .child_text(&button, ROW_HANDLE)
                .await?
                .map(|handle| handle.trim().to_string())
                .filter(|handle| !handle.is_empty());

            accounts.push(AccountCandidate {
                handle: button.id().to_string(),
                username,
                already_following: is_following_label(&label),
            });
        }
        Ok(accounts)
    }

    async fn follow(&self, account: &AccountCandidate) -> Result<(), PlatformError> {
        self.js_click(&ElementRef(account.handle.clone())).await?;
        self.settle().await;
        Ok(())
    }

    async fn visible_posts(&self) -> Result<Vec<PostCandidate>, PlatformError> {
        let articles = self
            .session
            .find_elements(&Locator::xpath(POST_ARTICLE))
            .await
            .map_err(platform_error)?;

        let mut posts = Vec::with_capacity(articles.len());
        for article in articles {
            match self.read_post(article).await {
                Ok(post) => posts.push(post),
                Err(PlatformError::StaleElement(msg)) => {
                    debug!("Post detached while reading: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(posts)
    }

    async fn like(&self, post: &PostCandidate) -> Result<(), PlatformError> {
        let article = ElementRef(post.handle.clone());
        let button = self
            .child(&article, LIKE_BUTTON)
            .await?
            .ok_or_else(|| PlatformError::ElementNotFound("like button".to_string()))?;
        self.js_click(&button).await?;
        self.settle().await;
        Ok(())
    }

    async fn open_reply(&self, post: &PostCandidate) -> Result<bool, PlatformError> {
        let article = ElementRef(post.handle.clone());
        let button = self
            .child(&article, REPLY_BUTTON)
            .await?
            .ok_or_else(|| PlatformError::ElementNotFound("reply button".to_string()))?;

        let disabled = self
            .session
            .attribute(&button, "aria-disabled")
            .await
            .map_err(platform_error)?;
        if disabled.as_deref() == Some("true") {
            return Ok(false);
        }

        self.js_click(&button).await?;
        match self.wait(REPLY_BOX, self.waits.element).await {
            Ok(_) => Ok(true),
            Err(PlatformError::Timeout(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn submit_reply(&self, text: &str) -> Result<(), PlatformError> {
        let reply_box = self.wait(REPLY_BOX, self.waits.element).await?;
        self.js_click(&reply_box).await?;
        self.session
            .send_keys(&reply_box, text)
            .await
            .map_err(platform_error)?;

        let send = self.wait(REPLY_SEND, self.waits.element).await?;
        self.js_click(&send).await?;
        self.settle().await;
        Ok(())
    }

    async fn scroll(&self) -> Result<u64, PlatformError> {
        self.session
            .execute_script(SCROLL_SCRIPT, vec![])
            .await
            .map_err(platform_error)?;
        self.settle().await;
        self.page_height().await
    }

    async fn page_height(&self) -> Result<u64, PlatformError> {
        let value = self
            .session
            .execute_script(HEIGHT_SCRIPT, vec![])
            .await
            .map_err(platform_error)?;
        Ok(height_of(&value))
    }

    async fn close(&self) {
        if let Err(e) = self.session.delete().await {
            warn!("Failed to end browser session: {}", e);
        }
        if let Some(mut process) = self.process.lock().await.take() {
            if let Err(e) = process.kill() {
                warn!("Failed to stop chromedriver: {}", e);
            }
        }
        info!("Browser closed");
    }
}

fn height_of(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
        .unwrap_or(0)
}

/// Opens browser sessions against a running driver or a freshly spawned one.
pub struct XSessionFactory {
    config: BotConfig,
    ready_timeout: Duration,
}

impl XSessionFactory {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            ready_timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl SessionFactory for XSessionFactory {
    async fn open(&self, headless: bool) -> Result<Box<dyn Platform>, PlatformError> {
        let (process, client) = match &self.config.driver_url {
            Some(url) => {
                let config = DriverConfig::new(url.clone()).with_headless(headless);
                let client = WebDriverClient::connect(config).await.map_err(platform_error)?;
                (None, client)
            }
            None => {
                info!("Starting chromedriver on port {}", self.config.driver_port);
                let (process, client) =
                    spawn_and_connect(self.config.process_config(headless), self.ready_timeout)
                        .await
                        .map_err(platform_error)?;
                (Some(process), client)
            }
        };

        let session = client.new_session().await.map_err(platform_error)?;
        Ok(Box::new(XPlatform::new(
            session,
            self.config.base_url.clone(),
            process,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_id() {
        assert_eq!(status_id("/alice/status/1790001234").as_deref(), Some("1790001234"));
        assert_eq!(
            status_id("https://x.com/alice/status/42/photo/1").as_deref(),
            Some("42")
        );
        assert_eq!(status_id("https://x.com/alice/status/42?s=20").as_deref(), Some("42"));
        assert_eq!(status_id("https://x.com/alice"), None);
        assert_eq!(status_id("/alice/status/"), None);
    }

    #[test]
    fn test_is_following_label() {
        assert!(is_following_label("Following @alice"));
        assert!(is_following_label("Unfollow @alice"));
        assert!(!is_following_label("Follow @alice"));
    }

    #[test]
    fn test_people_results_url() {
        assert_eq!(
            people_results_url("https://x.com/search?q=rust&src=typed_query"),
            "https://x.com/search?q=rust&src=typed_query&f=user"
        );
        assert_eq!(
            people_results_url("https://x.com/search?q=rust&f=user"),
            "https://x.com/search?q=rust&f=user"
        );
        assert_eq!(people_results_url("https://x.com/search"), "https://x.com/search?f=user");
    }

    #[test]
    fn test_platform_error_mapping() {
        assert!(matches!(
            platform_error(WebDriverError::NoSuchElement("x".into())),
            PlatformError::ElementNotFound(_)
        ));
        assert!(matches!(
            platform_error(WebDriverError::StaleElement("x".into())),
            PlatformError::StaleElement(_)
        ));
        assert!(matches!(
            platform_error(WebDriverError::InvalidSession("gone".into())),
            PlatformError::Connection(_)
        ));
        assert!(matches!(
            platform_error(WebDriverError::Connection("refused".into())),
            PlatformError::Connection(_)
        ));
        assert!(matches!(
            platform_error(WebDriverError::Protocol {
                error: "unknown error".into(),
                message: "boom".into()
            }),
            PlatformError::Other(_)
        ));
    }

    #[test]
    fn test_height_of() {
        assert_eq!(height_of(&json!(2400)), 2400);
        assert_eq!(height_of(&json!(2400.5)), 2400);
        assert_eq!(height_of(&json!(null)), 0);
    }
}
