//! Deduplicated store of fetched and generated content.

use xbot_database::{comment, headline, run_counter, timestamp, tweet, Database};

use crate::error::OrchestratorError;

/// How many prior texts are shown to the provider and checked for repeats.
pub const RECENT_WINDOW: i64 = 50;

/// Content history backed by the store.
#[derive(Debug, Clone)]
pub struct ContentCache {
    db: Database,
}

impl ContentCache {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn headline_exists(&self, text: &str) -> Result<bool, OrchestratorError> {
        Ok(headline::headline_exists(self.db.pool(), text).await?)
    }

    /// Store headlines from one source, returning how many were new.
    pub async fn save_headlines(
        &self,
        headlines: &[String],
        source: &str,
        run_number: i64,
    ) -> Result<usize, OrchestratorError> {
        Ok(headline::save_headlines(
            self.db.pool(),
            headlines,
            source,
            run_number,
            &timestamp::now(),
        )
        .await?)
    }

    /// Unposted headlines, newest first.
    pub async fn unused_headlines(&self, limit: i64) -> Result<Vec<String>, OrchestratorError> {
        Ok(headline::unused_headlines(self.db.pool(), limit).await?)
    }

    pub async fn mark_posted(&self, text: &str) -> Result<(), OrchestratorError> {
        Ok(headline::mark_posted(self.db.pool(), text).await?)
    }

    pub async fn recent_tweet_texts(&self, limit: i64) -> Result<Vec<String>, OrchestratorError> {
        Ok(tweet::recent_tweet_texts(self.db.pool(), limit).await?)
    }

    pub async fn recent_self_updates(&self, limit: i64) -> Result<Vec<String>, OrchestratorError> {
        Ok(tweet::recent_self_updates(self.db.pool(), limit).await?)
    }

    pub async fn recent_comments(&self, limit: i64) -> Result<Vec<String>, OrchestratorError> {
        Ok(comment::recent_comments(self.db.pool(), limit).await?)
    }

    /// Record a published tweet under `tag` (headline text or a self-update tag).
    pub async fn record_tweet(&self, tag: &str, text: &str) -> Result<(), OrchestratorError> {
        tweet::insert_tweet(self.db.pool(), tag, text, &timestamp::now()).await?;
        Ok(())
    }

    /// Record a self-update text; duplicates are ignored.
    pub async fn record_self_update(&self, text: &str) -> Result<bool, OrchestratorError> {
        Ok(tweet::insert_self_update(self.db.pool(), text, &timestamp::now()).await?)
    }

    /// Bump the run counter and return the new run number.
    pub async fn next_run(&self) -> Result<i64, OrchestratorError> {
        Ok(run_counter::increment(self.db.pool()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache() -> ContentCache {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        ContentCache::new(db)
    }

    #[tokio::test]
    async fn test_headline_lifecycle() {
        let cache = cache().await;
        let batch = vec![
            "Storm closes harbour".to_string(),
            "Storm closes harbour".to_string(),
            "Trains run late again".to_string(),
        ];

        assert_eq!(cache.save_headlines(&batch, "https://a", 1).await.unwrap(), 2);
        assert!(cache.headline_exists("Trains run late again").await.unwrap());

        cache.mark_posted("Storm closes harbour").await.unwrap();
        assert_eq!(
            cache.unused_headlines(50).await.unwrap(),
            vec!["Trains run late again"]
        );
    }

    #[tokio::test]
    async fn test_tweets_and_self_updates() {
        let cache = cache().await;

        cache.record_tweet(tweet::SELF_UPDATE_TAG, "hello").await.unwrap();
        assert!(cache.record_self_update("hello").await.unwrap());
        assert!(!cache.record_self_update("hello").await.unwrap());

        assert_eq!(cache.recent_tweet_texts(RECENT_WINDOW).await.unwrap(), vec!["hello"]);
        assert_eq!(cache.recent_self_updates(RECENT_WINDOW).await.unwrap(), vec!["hello"]);
        assert_eq!(cache.next_run().await.unwrap(), 1);
        assert_eq!(cache.next_run().await.unwrap(), 2);
    }
}
