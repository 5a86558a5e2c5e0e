//! HTTP fetching with bounded retries.

use rand::Rng;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::parse::{parse_feed, scrape_headlines};

/// Fetches raw headlines from news sources.
#[derive(Debug, Clone)]
pub struct HeadlineFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HeadlineFetcher {
    /// Create a fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch the headlines published by one source.
    ///
    /// Feed entries are returned as-is (up to `max_feed_items`); scraped
    /// headlines are length-filtered. Transport failures are retried with a
    /// randomized pause.
    pub async fn fetch(&self, source: &str) -> Result<Vec<String>, FetchError> {
        let url = Url::parse(source.trim()).map_err(|e| FetchError::InvalidUrl {
            url: source.to_string(),
            reason: e.to_string(),
        })?;

        let mut last_error = String::new();

        for attempt in 1..=self.config.max_attempts {
            match self.fetch_once(&url).await {
                Ok(headlines) => {
                    info!("Fetched {} headlines from {}", headlines.len(), url);
                    return Ok(headlines);
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to fetch {} failed: {}",
                        attempt, self.config.max_attempts, url, e
                    );
                    last_error = e.to_string();
                }
            }

            if attempt < self.config.max_attempts {
                sleep(self.backoff()).await;
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.config.max_attempts,
            last_error,
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<String>, FetchError> {
        debug!("Fetching source: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;

        if let Some(titles) = parse_feed(&body, self.config.max_feed_items) {
            debug!("{} parsed as feed", url);
            return Ok(titles);
        }

        let html = String::from_utf8_lossy(&body);
        Ok(scrape_headlines(&html, self.config.min_headline_chars))
    }

    fn backoff(&self) -> std::time::Duration {
        let min = self.config.backoff_min.as_millis() as u64;
        let max = self.config.backoff_max.as_millis() as u64;
        if max == 0 {
            return std::time::Duration::ZERO;
        }
        let millis = rand::thread_rng().gen_range(min..=max.max(min));
        std::time::Duration::from_millis(millis)
    }
}
