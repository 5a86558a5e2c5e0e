//! Liking posts found through a keyword search.

use tracing::info;
use xbot_database::{like, timestamp, ActionType};

use super::{
    contain, fallback_post_id, on_candidate, pick_keyword, tolerate, ActionContext, ActionReport,
    ScrollBudget,
};
use crate::error::OrchestratorError;
use crate::platform::SearchTarget;
use crate::quota::{run_cap, PER_RUN_CEILING};

async fn like_posts(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    let p = &ctx.settings.personality;
    let limit = p.daily_like_limit;
    if !ctx.quotas.under_limit(ActionType::Like, limit).await? {
        return Ok(ActionReport::Skipped(format!(
            "daily like limit ({}) reached",
            limit
        )));
    }

    let Some(keyword) = pick_keyword(&p.search_keywords) else {
        return Ok(ActionReport::Skipped("no search keywords".to_string()));
    };
    info!("Searching for posts with keyword: {}", keyword);
    ctx.platform.search(&keyword, SearchTarget::Posts).await?;
    ctx.pacing.pause(1.0, 5.0).await;

    let pool = ctx.cache.database().pool();
    let cap = run_cap(ctx.quotas.remaining(ActionType::Like, limit).await?, PER_RUN_CEILING);
    let mut liked = 0;
    let mut budget = ScrollBudget::start(ctx.platform, p.scroll_attempts).await?;

    while liked < cap && budget.has_budget() {
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
            if liked >= cap || !ctx.quotas.under_limit(ActionType::Like, limit).await? {
                break;
            }
            if post.liked {
                continue;
            }

            let post_id = post.post_id.clone().unwrap_or_else(fallback_post_id);
            if like::is_liked(pool, &post_id).await? {
                info!("Skipping already liked post {}", post_id);
                continue;
            }

            let platform = ctx.platform;
            let clicked = on_candidate(ctx.pacing, "post", |_| async move {
                platform.like(post).await.map_err(OrchestratorError::from)
            })
            .await?;
            if clicked.is_none() {
                continue;
            }

            ctx.pacing.pause(1.0, 5.0).await;
            if like::record_like(pool, &post_id, &timestamp::now()).await? {
                liked += 1;
                info!("Liked post with ID: {}", post_id);
                break;
            }
        }

        if liked >= cap {
            break;
        }
        if !budget.advance(ctx.platform, ctx.pacing).await? {
            break;
        }
    }

    info!(
        "Liked {} post(s) this run. Today's like count: {}",
        liked,
        ctx.quotas.count_today(ActionType::Like).await?
    );
    Ok(ActionReport::Completed(liked))
}

/// Like step of a cycle.
pub async fn run(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    contain("Like posts", like_posts(ctx).await)
}
