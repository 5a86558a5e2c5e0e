//! Browser-facing platform abstraction.

use async_trait::async_trait;

use crate::error::PlatformError;

/// What a search should list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Posts,
    Accounts,
}

/// An account row with a follow button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCandidate {
    /// Adapter-specific reference to the follow button.
    pub handle: String,
    /// `@name` shown next to the button, when it could be read.
    pub username: Option<String>,
    pub already_following: bool,
}

/// A post in the timeline or search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCandidate {
    /// Adapter-specific reference to the post element.
    pub handle: String,
    /// Status id from the permalink, when present.
    pub post_id: Option<String>,
    /// Author handle without the leading `@`.
    pub author: Option<String>,
    pub text: String,
    pub liked: bool,
}

/// One logged-in browser session on the target platform.
///
/// Each method is a single attempt; retries and pacing between attempts are
/// decided by the caller.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Run the login form once.
    ///
    /// # Arguments
    /// * `username` - Account handle
    /// * `password` - Account password
    /// * `email` - Answer to the identity challenge, if one is shown
    async fn login(&self, username: &str, password: &str, email: &str)
        -> Result<(), PlatformError>;

    /// Reload the current page.
    async fn refresh(&self) -> Result<(), PlatformError>;

    /// Compose and publish a post from the home timeline.
    async fn publish(&self, text: &str) -> Result<(), PlatformError>;

    /// Search for `query`, falling back to the home timeline when the search
    /// bar is missing.
    async fn search(&self, query: &str, target: SearchTarget) -> Result<(), PlatformError>;

    /// Account rows currently rendered.
    async fn visible_accounts(&self) -> Result<Vec<AccountCandidate>, PlatformError>;

    /// Click the follow button of an account.
    async fn follow(&self, account: &AccountCandidate) -> Result<(), PlatformError>;

    /// Posts currently rendered.
    async fn visible_posts(&self) -> Result<Vec<PostCandidate>, PlatformError>;

    /// Click the like button of a post.
    async fn like(&self, post: &PostCandidate) -> Result<(), PlatformError>;

    /// Open the reply box of a post.
    ///
    /// Returns `false` when the author restricted replies.
    async fn open_reply(&self, post: &PostCandidate) -> Result<bool, PlatformError>;

    /// Type and send the reply opened by [`Platform::open_reply`].
    async fn submit_reply(&self, text: &str) -> Result<(), PlatformError>;

    /// Scroll down for more content and return the new page height.
    async fn scroll(&self) -> Result<u64, PlatformError>;

    /// Current page height.
    async fn page_height(&self) -> Result<u64, PlatformError>;

    /// End the browser session.
    async fn close(&self);
}

/// Opens browser sessions.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self, headless: bool) -> Result<Box<dyn Platform>, PlatformError>;
}
