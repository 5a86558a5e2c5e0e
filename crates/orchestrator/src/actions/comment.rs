//! Replying to posts found through a keyword search.

use tracing::info;
use xbot_database::{comment, timestamp, ActionType};

use super::{
    contain, fallback_post_id, on_candidate, pick_keyword, tolerate, ActionContext, ActionReport,
    ScrollBudget,
};
use crate::cache::RECENT_WINDOW;
use crate::error::OrchestratorError;
use crate::generation::{comment_fallback, generate_unique, DEFAULT_MAX_ATTEMPTS};
use crate::language::target_language;
use crate::platform::{PostCandidate, SearchTarget};
use crate::prompt;
use crate::quota::{run_cap, PER_RUN_CEILING};

const UNKNOWN_AUTHOR: &str = "unknown";
const EMPTY_POST: &str = "[Empty or media-only post]";

/// Write a reply to a post, unique among the recent replies.
pub async fn compose_reply(
    ctx: &ActionContext<'_>,
    author: &str,
    post_text: &str,
) -> Result<String, OrchestratorError> {
    let p = &ctx.settings.personality;
    let recent = ctx.cache.recent_comments(RECENT_WINDOW).await?;
    let language = target_language(p, post_text);

    let request = prompt::comment(
        p,
        author,
        post_text,
        &language,
        &recent,
        prompt::roll_emoji(p),
    );
    let generated = generate_unique(
        ctx.brain,
        &request,
        &recent,
        DEFAULT_MAX_ATTEMPTS,
        comment_fallback(&p.personality_preset),
    )
    .await;

    Ok(generated.into_text())
}

/// Try to reply to one post. Returns `true` when a new reply was recorded.
async fn reply_to(
    ctx: &ActionContext<'_>,
    post: &PostCandidate,
) -> Result<bool, OrchestratorError> {
    let pool = ctx.cache.database().pool();
    let post_id = post.post_id.clone().unwrap_or_else(fallback_post_id);
    let author = post.author.as_deref().unwrap_or(UNKNOWN_AUTHOR);
    let text = if post.text.trim().is_empty() {
        EMPTY_POST
    } else {
        post.text.as_str()
    };

    if comment::has_commented(pool, &post_id).await? {
        info!("Skipping already commented post {} by @{}", post_id, author);
        return Ok(false);
    }

    match ctx.platform.open_reply(post).await {
        Ok(true) => {}
        Ok(false) => {
            info!("Post {} by @{} has restricted replies, skipping", post_id, author);
            return Ok(false);
        }
        Err(e) => {
            tolerate("post", e)?;
            return Ok(false);
        }
    }
    ctx.pacing.pause(1.0, 2.0).await;

    let reply = compose_reply(ctx, author, text).await?;

    let (platform, reply_text) = (ctx.platform, reply.as_str());
    let sent = on_candidate(ctx.pacing, "reply", |_| async move {
        platform.submit_reply(reply_text).await.map_err(OrchestratorError::from)
    })
    .await?;
    if sent.is_none() {
        return Ok(false);
    }
    ctx.pacing.pause(2.0, 4.0).await;

    if comment::record_comment(pool, &post_id, author, &reply, &timestamp::now()).await? {
        info!("Commented on post {} by @{}: {}", post_id, author, reply);
        Ok(true)
    } else {
        info!("Skipped duplicate comment on post {} by @{}", post_id, author);
        Ok(false)
    }
}

async fn comment_on_posts(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    let p = &ctx.settings.personality;
    let limit = p.daily_comment_limit;
    if !ctx.quotas.under_limit(ActionType::Comment, limit).await? {
        return Ok(ActionReport::Skipped(format!(
            "daily comment limit ({}) reached",
            limit
        )));
    }

    let Some(keyword) = pick_keyword(&p.search_keywords) else {
        return Ok(ActionReport::Skipped("no search keywords".to_string()));
    };
    info!("Selected keyword for this run: {}", keyword);
    ctx.platform.search(&keyword, SearchTarget::Posts).await?;
    ctx.pacing.pause(2.0, 4.0).await;

    let cap = run_cap(
        ctx.quotas.remaining(ActionType::Comment, limit).await?,
        PER_RUN_CEILING,
    );
    let mut commented = 0;
    let mut budget = ScrollBudget::start(ctx.platform, p.scroll_attempts).await?;

    while commented < cap && budget.has_budget() {
        budget.spend();

        let posts = match ctx.platform.visible_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                tolerate("post list", e)?;
                Vec::new()
            }
        };
        info!("Found {} posts", posts.len());

        for post in &posts {
            if commented >= cap || !ctx.quotas.under_limit(ActionType::Comment, limit).await? {
                break;
            }
            if reply_to(ctx, post).await? {
                commented += 1;
            }
        }

        if commented >= cap {
            break;
        }
        if !budget.advance(ctx.platform, ctx.pacing).await? {
            break;
        }
    }

    info!(
        "Commented {} this run. Total today: {}",
        commented,
        ctx.quotas.count_today(ActionType::Comment).await?
    );
    Ok(ActionReport::Completed(commented))
}

/// Comment step of a cycle.
pub async fn run(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    contain("Comment on posts", comment_on_posts(ctx).await)
}
