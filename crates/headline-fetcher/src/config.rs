//! Configuration for the headline fetcher.

use std::time::Duration;

/// Desktop browser user agent; several news sites refuse obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Settings for [`crate::HeadlineFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per source.
    pub max_attempts: u32,
    /// Lower bound of the randomized pause between attempts.
    pub backoff_min: Duration,
    /// Upper bound of the randomized pause between attempts.
    pub backoff_max: Duration,
    /// Feed entries inspected per source.
    pub max_feed_items: usize,
    /// Scraped headlines shorter than this (in characters) are dropped.
    pub min_headline_chars: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff_min: Duration::from_secs(5),
            backoff_max: Duration::from_secs(10),
            max_feed_items: 100,
            min_headline_chars: 10,
        }
    }
}

impl FetcherConfig {
    /// Set the randomized pause between attempts.
    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.backoff_min = min;
        self.backoff_max = max.max(min);
        self
    }

    /// Set the number of attempts per source.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_feed_items, 100);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_builders_clamp() {
        let config = FetcherConfig::default()
            .with_max_attempts(0)
            .with_backoff(Duration::from_secs(3), Duration::from_secs(1));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.backoff_max, Duration::from_secs(3));
    }
}
