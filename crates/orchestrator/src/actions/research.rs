//! Headline research: pull new headlines from every configured source.

use tracing::{error, info, warn};

use super::{contain, ActionContext, ActionReport};
use crate::error::OrchestratorError;

/// Items inspected per source.
pub const MAX_INSPECTED: usize = 100;

/// New headlines kept per source.
pub const MAX_NEW_PER_SOURCE: usize = 10;

/// Per-source outcome of a research pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub source: String,
    /// Headlines written to the store.
    pub new: usize,
    /// Headlines already known.
    pub skipped: usize,
}

/// Fetch and store headlines for every source, returning per-source counts.
///
/// The run counter is bumped first so every headline carries this run's number.
pub async fn fetch_headlines(
    ctx: &ActionContext<'_>,
) -> Result<Vec<FetchSummary>, OrchestratorError> {
    let run = ctx.cache.next_run().await?;
    let sources = &ctx.settings.personality.content_sources;

    if sources.is_empty() {
        info!("Run {}: no content sources configured", run);
        return Ok(Vec::new());
    }

    info!("Run {}: fetching headlines from {} sources", run, sources.len());
    let mut summaries = Vec::with_capacity(sources.len());

    for source in sources {
        let raw = match ctx.source.fetch(source).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Run {}: fetch failed for {}: {}", run, source, e);
                continue;
            }
        };

        let mut fresh: Vec<String> = Vec::new();
        let mut skipped = 0;
        for headline in raw.iter().take(MAX_INSPECTED) {
            if fresh.contains(headline) || ctx.cache.headline_exists(headline).await? {
                skipped += 1;
                continue;
            }
            fresh.push(headline.clone());
            if fresh.len() >= MAX_NEW_PER_SOURCE {
                break;
            }
        }

        let new = ctx.cache.save_headlines(&fresh, source, run).await?;
        if new == 0 {
            warn!("Run {}: no new headlines from {} (skipped {})", run, source, skipped);
        } else {
            info!(
                "Run {}: saved {} new headlines from {} (skipped {} duplicates)",
                run, new, source, skipped
            );
        }

        summaries.push(FetchSummary {
            source: source.clone(),
            new,
            skipped,
        });
    }

    let total: usize = summaries.iter().map(|s| s.new).sum();
    info!("Run {}: total saved {} new headlines", run, total);
    Ok(summaries)
}

/// Research step of a cycle.
pub async fn run(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    let result = fetch_headlines(ctx).await.map(|summaries| {
        let total: usize = summaries.iter().map(|s| s.new).sum();
        ActionReport::Completed(u32::try_from(total).unwrap_or(u32::MAX))
    });
    contain("Headline research", result)
}
