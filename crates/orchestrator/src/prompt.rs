//! Prompt construction for posts, headline picks and replies.

use brain_core::GenerationRequest;
use rand::Rng;

use crate::settings::Personality;

fn joined(items: &[String]) -> String {
    items.join(", ")
}

fn persona(p: &Personality) -> String {
    format!(
        "You are {} with a {} tone.",
        p.personality_description,
        joined(&p.tone_keywords)
    )
}

fn emoji_clause(p: &Personality, with_emoji: bool) -> String {
    if with_emoji && !p.emoji_list.is_empty() {
        format!("Add one emoji from {}.", joined(&p.emoji_list))
    } else {
        "Do not use emojis.".to_string()
    }
}

fn hashtag_clause(p: &Personality) -> String {
    let mut clause = String::new();
    if !p.hashtags.is_empty() {
        clause.push_str(&format!("Use 1-2 hashtags from {}. ", joined(&p.hashtags)));
    }
    if !p.custom_phrases.is_empty() {
        clause.push_str(&format!(
            "Optionally use a phrase from {}. ",
            joined(&p.custom_phrases)
        ));
    }
    clause
}

/// Roll whether this text gets an emoji.
pub fn roll_emoji(p: &Personality) -> bool {
    p.use_emojis && rand::thread_rng().gen_range(0..100) < p.emoji_frequency
}

/// A self update about `topic`.
pub fn self_update(
    p: &Personality,
    topic: &str,
    language: &str,
    avoid: &[String],
    with_emoji: bool,
) -> GenerationRequest {
    let instruction = format!(
        "{} Generate a unique tweet under 280 characters about {} in {}. Avoid these previous tweets: {}. {}{}",
        persona(p),
        topic,
        language,
        joined(avoid),
        hashtag_clause(p),
        emoji_clause(p, with_emoji)
    );

    GenerationRequest::new(instruction)
        .with_input("Generate a tweet.")
        .with_max_tokens(150)
        .with_temperature(1.0)
}

/// Ask the provider to pick one headline by its index.
pub fn headline_pick(p: &Personality, headlines: &[String]) -> GenerationRequest {
    let numbered = headlines
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{}: {}", i, h))
        .collect::<Vec<_>>()
        .join("\n");

    let instruction = format!(
        "You're {}. Pick the most interesting headline from this numbered list based on your personality. Return only the number.\nHeadlines:\n{}",
        p.personality_description, numbered
    );

    GenerationRequest::new(instruction)
        .with_max_tokens(10)
        .with_temperature(0.7)
}

/// A tweet about a chosen headline.
pub fn headline_tweet(
    p: &Personality,
    headline: &str,
    language: &str,
    with_emoji: bool,
) -> GenerationRequest {
    let instruction = format!(
        "{} Generate a tweet under 280 characters about the headline: '{}' in {}. {}{}",
        persona(p),
        headline,
        language,
        hashtag_clause(p),
        emoji_clause(p, with_emoji)
    );

    GenerationRequest::new(instruction)
        .with_input("Generate a tweet.")
        .with_max_tokens(150)
        .with_temperature(0.8)
}

/// A reply to a post by `poster`.
pub fn comment(
    p: &Personality,
    poster: &str,
    post_text: &str,
    language: &str,
    avoid: &[String],
    with_emoji: bool,
) -> GenerationRequest {
    let instruction = format!(
        "{} Generate a short Twitter comment (max 280 characters) responding to this post by @{}: '{}' in {}. {}{} Avoid repeating these previous comments: {}.",
        persona(p),
        poster,
        post_text,
        language,
        hashtag_clause(p),
        emoji_clause(p, with_emoji),
        joined(avoid)
    );

    GenerationRequest::new(instruction)
        .with_input("Generate a comment.")
        .with_max_tokens(150)
        .with_temperature(0.8)
}

/// Parse a headline-pick reply into a valid index.
pub fn parse_index(reply: &str, len: usize) -> Option<usize> {
    let digits: String = reply
        .trim()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<usize>().ok().filter(|i| *i < len)
}
