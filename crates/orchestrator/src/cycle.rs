//! One pass through every enabled action, in fixed order.

use tracing::info;

use crate::actions::{comment, follow, like, post, research, ActionContext, ActionReport};
use crate::error::OrchestratorError;

/// What each step of a cycle did. `None` means the step is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub research: Option<ActionReport>,
    pub post: Option<ActionReport>,
    pub follow: Option<ActionReport>,
    pub like: Option<ActionReport>,
    pub comment: Option<ActionReport>,
}

/// Run research, post, follow, like and comment.
///
/// Returns early only when the browser connection is lost.
pub async fn run_cycle(ctx: &ActionContext<'_>) -> Result<CycleReport, OrchestratorError> {
    let p = &ctx.settings.personality;
    let mut report = CycleReport::default();

    if p.research_enabled {
        report.research = Some(research::run(ctx).await?);
    } else {
        info!("Research disabled, skipping headline fetch");
    }
    if p.post_enabled {
        report.post = Some(post::run(ctx).await?);
    }
    if p.follow_enabled {
        report.follow = Some(follow::run(ctx).await?);
    }
    if p.like_enabled {
        report.like = Some(like::run(ctx).await?);
    }
    if p.comment_enabled {
        report.comment = Some(comment::run(ctx).await?);
    }

    Ok(report)
}
