//! Following accounts found through a keyword search.

use tracing::{info, warn};
use xbot_database::{follow, timestamp, ActionType};

use super::{
    contain, on_candidate, pick_keyword, tolerate, ActionContext, ActionReport, ScrollBudget,
};
use crate::error::OrchestratorError;
use crate::platform::SearchTarget;
use crate::quota::{run_cap, PER_RUN_CEILING};

/// Keywords used when neither follow nor search keywords are set.
pub fn default_keywords(preset: &str) -> Vec<String> {
    let keywords: &[&str] = if preset == "BerlinerSchnauze" {
        &["Berlin", "Berliner Leben", "BLN News"]
    } else {
        &["news", "trending"]
    };
    keywords.iter().map(|k| k.to_string()).collect()
}

fn keywords(ctx: &ActionContext<'_>) -> Vec<String> {
    let p = &ctx.settings.personality;
    let clean = |list: &[String]| -> Vec<String> {
        list.iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    };

    let follow_keywords = clean(&p.follow_keywords);
    if !follow_keywords.is_empty() {
        return follow_keywords;
    }
    let search_keywords = clean(&p.search_keywords);
    if !search_keywords.is_empty() {
        return search_keywords;
    }
    info!(
        "No follow keywords configured, using defaults for '{}'",
        p.personality_preset
    );
    default_keywords(&p.personality_preset)
}

fn same_handle(a: &str, b: &str) -> bool {
    a.trim().trim_start_matches('@').eq_ignore_ascii_case(b.trim().trim_start_matches('@'))
}

async fn follow_accounts(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    let p = &ctx.settings.personality;
    let limit = p.daily_follow_limit;
    if !ctx.quotas.under_limit(ActionType::Follow, limit).await? {
        return Ok(ActionReport::Skipped(format!(
            "daily follow limit ({}) reached",
            limit
        )));
    }

    let keywords = keywords(ctx);
    let Some(keyword) = pick_keyword(&keywords) else {
        return Ok(ActionReport::Skipped("no follow keywords".to_string()));
    };
    info!("Searching for accounts with keyword: {}", keyword);
    ctx.platform.search(&keyword, SearchTarget::Accounts).await?;
    ctx.pacing.pause(1.0, 5.0).await;

    let cap = run_cap(ctx.quotas.remaining(ActionType::Follow, limit).await?, PER_RUN_CEILING);
    let mut followed = 0;
    let mut budget = ScrollBudget::start(ctx.platform, p.scroll_attempts).await?;

    while followed < cap && budget.has_budget() {
        budget.spend();

        let accounts = match ctx.platform.visible_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tolerate("account list", e)?;
                Vec::new()
            }
        };
        info!("Found {} follow buttons", accounts.len());

        for account in &accounts {
            if followed >= cap || !ctx.quotas.under_limit(ActionType::Follow, limit).await? {
                break;
            }
            if account.already_following {
                continue;
            }
            let Some(username) = account.username.as_deref() else {
                continue;
            };
            if same_handle(username, &ctx.settings.username)
                || follow::is_followed(ctx.cache.database().pool(), username).await?
            {
                continue;
            }

            let platform = ctx.platform;
            let clicked = on_candidate(ctx.pacing, "follow button", |_| async move {
                platform.follow(account).await.map_err(OrchestratorError::from)
            })
            .await?;
            if clicked.is_none() {
                continue;
            }

            follow::record_follow(ctx.cache.database().pool(), username, &timestamp::now()).await?;
            followed += 1;
            info!("Followed account: {}", username);
            ctx.pacing.pause(1.0, 5.0).await;
            break;
        }

        if followed >= cap {
            break;
        }
        if !budget.advance(ctx.platform, ctx.pacing).await? {
            break;
        }
    }

    let today = ctx.quotas.count_today(ActionType::Follow).await?;
    if followed == 0 {
        warn!("No new accounts followed this run. Today's count: {}", today);
    } else {
        info!("Followed {} new account(s) this run. Today's count: {}", followed, today);
    }
    Ok(ActionReport::Completed(followed))
}

/// Follow step of a cycle.
pub async fn run(ctx: &ActionContext<'_>) -> Result<ActionReport, OrchestratorError> {
    contain("Follow accounts", follow_accounts(ctx).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keywords() {
        assert_eq!(default_keywords("default"), vec!["news", "trending"]);
        assert_eq!(default_keywords("BerlinerSchnauze")[0], "Berlin");
    }

    #[test]
    fn test_same_handle() {
        assert!(same_handle("@NewsBot", "newsbot"));
        assert!(!same_handle("@alice", "newsbot"));
    }
}
