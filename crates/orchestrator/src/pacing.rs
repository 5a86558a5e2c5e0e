//! Randomized human-like pauses.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// How the bot waits between UI steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Sleep for randomized, human-looking intervals.
    #[default]
    Human,
    /// Never sleep. Used by tests and dry runs.
    Instant,
}

impl Pacing {
    /// Sleep a random duration between `min` and `max` seconds.
    pub async fn pause(&self, min_secs: f64, max_secs: f64) {
        if *self == Pacing::Instant {
            return;
        }
        let secs = if max_secs > min_secs {
            rand::thread_rng().gen_range(min_secs..=max_secs)
        } else {
            min_secs
        };
        sleep(Duration::from_secs_f64(secs.max(0.0))).await;
    }

    /// Sleep a fixed duration.
    pub async fn wait(&self, duration: Duration) {
        if *self == Pacing::Instant || duration.is_zero() {
            return;
        }
        sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_instant_never_sleeps() {
        let start = Instant::now();
        Pacing::Instant.pause(5.0, 10.0).await;
        Pacing::Instant.wait(Duration::from_secs(60)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_human_pause_is_bounded() {
        let start = Instant::now();
        Pacing::Human.pause(0.01, 0.02).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed < Duration::from_secs(1));
    }
}
