//! Posting: compose a tweet, publish it, then record it.

use brain_core::BrainError;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{error, info, warn};
use xbot_database::tweet::{
    DUPLICATE_AVOIDED_TAG, FALLBACK_TAG, POSTING_FAILURE_TAG, SELF_UPDATE_TAG,
};
use xbot_database::ActionType;

use super::{contain, ActionContext, ActionReport};
use crate::cache::RECENT_WINDOW;
use crate::error::OrchestratorError;
use crate::generation::{generate_unique, DEFAULT_MAX_ATTEMPTS, SELF_UPDATE_FALLBACK};
use crate::prompt;
use crate::retry::{retry, Outcome, RetryPolicy};
use crate::text::{effective_length, sanitize, truncate};

const DEFAULT_TOPIC: &str = "daily life";

/// A composed tweet and how it should be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub text: String,
    /// Headline text or one of the self-update tags.
    pub tag: String,
    /// Headline to mark posted once published.
    pub headline: Option<String>,
}

impl Draft {
    fn self_update(text: String, tag: &str) -> Self {
        Self {
            text,
            tag: tag.to_string(),
            headline: None,
        }
    }

    fn is_self_update(&self) -> bool {
        self.headline.is_none()
    }
}

/// Generate a self update about a random topic, unique among recent ones.
pub async fn compose_self_update(ctx: &ActionContext<'_>) -> Result<String, OrchestratorError> {
    let p = &ctx.settings.personality;
    let topic = p
        .self_update_topics
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string());
    let recent = ctx.cache.recent_self_updates(RECENT_WINDOW).await?;

    let request = prompt::self_update(p, &topic, &p.language, &recent, prompt::roll_emoji(p));
    let generated = generate_unique(
        ctx.brain,
        &request,
        &recent,
        DEFAULT_MAX_ATTEMPTS,
        SELF_UPDATE_FALLBACK,
    )
    .await;

    Ok(truncate(generated.text()))
}

async fn compose_headline_tweet(
    ctx: &ActionContext<'_>,
    headlines: &[String],
) -> Result<Draft, OrchestratorError> {
    let p = &ctx.settings.personality;

    let reply = ctx.brain.generate(prompt::headline_pick(p, headlines)).await?;
    let index = prompt::parse_index(&reply, headlines.len()).ok_or_else(|| {
        BrainError::ProcessingFailed(format!("invalid headline index '{}'", reply.trim()))
    })?;
    let headline = headlines[index].clone();
    info!("{} picked headline {}: {}", ctx.brain.name(), index, headline);

    let request = prompt::headline_tweet(p, &headline, &p.language, prompt::roll_emoji(p));
    let text = sanitize(&ctx.brain.generate(request).await?);
    if text.is_empty() {
        return Err(BrainError::EmptyResponse("headline tweet".to_string()).into());
    }

    Ok(Draft {
        text,
        tag: headline.clone(),
        headline: Some(headline),
    })
}

/// Choose between a headline tweet and a self update, and write it.
pub async fn compose(ctx: &ActionContext<'_>) -> Result<Draft, OrchestratorError> {
    let p = &ctx.settings.personality;
    let recent_tweets = ctx.cache.recent_tweet_texts(RECENT_WINDOW).await?;

    let headlines = if p.research_enabled {
        ctx.cache.unused_headlines(RECENT_WINDOW).await?
    } else {
        Vec::new()
    };
    let chance = f64::from(p.tweet_type_ratio.min(100)) / 100.0;
    let wants_headline = !headlines.is_empty() && rand::thread_rng().gen_bool(chance);

    let draft = if wants_headline {
        match compose_headline_tweet(ctx, &headlines).await {
            Ok(draft) => draft,
            Err(e) => {
                error!("Headline tweet failed: {}, falling back to self update", e);
                Draft::self_update(compose_self_update(ctx).await?, FALLBACK_TAG)
            }
        }
    } else {
        Draft::self_update(compose_self_update(ctx).await?, SELF_UPDATE_TAG)
    };

    if recent_tweets.contains(&draft.text) {
        warn!("Duplicate tweet detected: {}, generating new self update", draft.text);
        let text = compose_self_update(ctx).await?;
        return Ok(Draft::self_update(text, DUPLICATE_AVOIDED_TAG));
    }

    Ok(draft)
}

async fn publish(ctx: &ActionContext<'_>, text: &str) -> Outcome<()> {
    let platform = ctx.platform;
    retry(RetryPolicy::publish(), ctx.pacing, "Posting", |attempt| async move {
        if attempt > 1 {
            platform.refresh().await?;
        }
        platform.publish(text).await?;
        Ok(())
    })
    .await
}

async fn record(ctx: &ActionContext<'_>, draft: &Draft) -> Result<(), OrchestratorError> {
    ctx.cache.record_tweet(&draft.tag, &draft.text).await?;
    if draft.is_self_update() {
        ctx.cache.record_self_update(&draft.text).await?;
    }
    if let Some(headline) = &draft.headline {
        ctx.cache.mark_posted(headline).await?;
    }
    Ok(())
}

async fn post(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    let limit = ctx.settings.personality.daily_post_limit;
    if !ctx.quotas.under_limit(ActionType::Post, limit).await? {
        return Ok(ActionReport::Skipped(format!(
            "daily post limit ({}) reached",
            limit
        )));
    }

    let draft = compose(ctx).await?;
    info!(
        "Generated tweet: {} ({} chars)",
        draft.text,
        effective_length(&draft.text)
    );

    let failure = match publish(ctx, &draft.text).await {
        Outcome::Success(()) => {
            record(ctx, &draft).await?;
            info!(
                "Posted successfully. Today's post count: {}",
                ctx.quotas.count_today(ActionType::Post).await?
            );
            return Ok(ActionReport::Completed(1));
        }
        Outcome::Fatal(e) => return Err(e),
        Outcome::Skip(e) => e,
    };

    error!("Posting failed: {}, falling back to a fresh self update", failure);
    let fallback = Draft::self_update(compose_self_update(ctx).await?, POSTING_FAILURE_TAG);
    match publish(ctx, &fallback.text).await {
        Outcome::Success(()) => {
            record(ctx, &fallback).await?;
            info!("Posted fallback tweet: {}", fallback.text);
            Ok(ActionReport::Completed(1))
        }
        Outcome::Skip(e) | Outcome::Fatal(e) => Err(e),
    }
}

/// Posting step of a cycle. Publishes at most one tweet.
pub async fn run(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    contain("Posting", post(ctx).await)
}
