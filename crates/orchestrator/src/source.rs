//! Headline sources.

use async_trait::async_trait;
use headline_fetcher::{FetchError, HeadlineFetcher};

/// Produces raw headline texts for a source URL.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<Vec<String>, FetchError>;
}

#[async_trait]
impl HeadlineSource for HeadlineFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<String>, FetchError> {
        HeadlineFetcher::fetch(self, source).await
    }
}
