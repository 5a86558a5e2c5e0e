//! Bounded regenerate-on-duplicate text generation.

use brain_core::{Brain, GenerationRequest};
use tracing::{info, warn};

use crate::text::sanitize;

/// Attempts before falling back to a canned text.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Canned self update used when generation keeps failing.
pub const SELF_UPDATE_FALLBACK: &str = "Just vibing today! #LetsGetIt";

/// Canned reply used when generation keeps failing.
pub const COMMENT_FALLBACK: &str = "Cool post, thanks for sharing!";

/// Canned reply for the `BerlinerSchnauze` preset.
pub const BERLIN_COMMENT_FALLBACK: &str = "Kiek mal, wie schnieke der Post is!";

/// Reply fallback for a personality preset.
pub fn comment_fallback(preset: &str) -> &'static str {
    if preset == "BerlinerSchnauze" {
        BERLIN_COMMENT_FALLBACK
    } else {
        COMMENT_FALLBACK
    }
}

/// Outcome of [`generate_unique`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// A fresh text not seen in the recent window.
    Accepted(String),
    /// Every attempt failed or repeated; this is the fallback text.
    ExhaustedFallback(String),
}

impl Generated {
    pub fn text(&self) -> &str {
        match self {
            Generated::Accepted(text) | Generated::ExhaustedFallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Generated::Accepted(text) | Generated::ExhaustedFallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generated::ExhaustedFallback(_))
    }
}

/// Ask `brain` for text until one is not in `recent`.
///
/// Provider errors, empty output and repeats each consume an attempt.
pub async fn generate_unique(
    brain: &dyn Brain,
    request: &GenerationRequest,
    recent: &[String],
    max_attempts: u32,
    fallback: &str,
) -> Generated {
    for attempt in 1..=max_attempts.max(1) {
        match brain.generate(request.clone()).await {
            Ok(raw) => {
                let text = sanitize(&raw);
                if text.is_empty() {
                    warn!("{} returned empty text on attempt {}", brain.name(), attempt);
                } else if recent.iter().any(|r| r == &text) {
                    info!("Generated duplicate on attempt {}: {}, retrying", attempt, text);
                } else {
                    return Generated::Accepted(text);
                }
            }
            Err(e) => {
                warn!("{} generation failed on attempt {}: {}", brain.name(), attempt, e);
            }
        }
    }

    warn!("Max attempts reached for unique text, using fallback");
    Generated::ExhaustedFallback(fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_brain::{FailingBrain, ScriptedBrain};

    fn recent(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_accepts_first_unseen_output() {
        let brain = ScriptedBrain::new(["old one", "old two", "brand new"]);
        let request = GenerationRequest::new("write");

        let result = generate_unique(
            &brain,
            &request,
            &recent(&["old one", "old two"]),
            DEFAULT_MAX_ATTEMPTS,
            SELF_UPDATE_FALLBACK,
        )
        .await;

        assert_eq!(result, Generated::Accepted("brand new".to_string()));
        assert_eq!(brain.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_duplicates_exhaust_to_fallback() {
        let brain = ScriptedBrain::new(Vec::<String>::new()).repeat_when_exhausted("\"old one\"");
        let request = GenerationRequest::new("write");

        let result = generate_unique(
            &brain,
            &request,
            &recent(&["old one"]),
            DEFAULT_MAX_ATTEMPTS,
            SELF_UPDATE_FALLBACK,
        )
        .await;

        assert_eq!(
            result,
            Generated::ExhaustedFallback(SELF_UPDATE_FALLBACK.to_string())
        );
        assert!(result.is_fallback());
        assert_eq!(brain.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_errors_consume_attempts() {
        let brain = ScriptedBrain::new(Vec::<String>::new());
        brain.push_error("rate limited").await;
        brain.push("**Fresh** take").await;

        let result = generate_unique(
            &brain,
            &GenerationRequest::new("write"),
            &[],
            DEFAULT_MAX_ATTEMPTS,
            COMMENT_FALLBACK,
        )
        .await;
        assert_eq!(result.text(), "Fresh take");

        let failing = FailingBrain::new("down");
        let result = generate_unique(
            &failing,
            &GenerationRequest::new("write"),
            &[],
            DEFAULT_MAX_ATTEMPTS,
            comment_fallback("BerlinerSchnauze"),
        )
        .await;
        assert_eq!(result.into_text(), BERLIN_COMMENT_FALLBACK);
    }
}
