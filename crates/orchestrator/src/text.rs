//! Platform length rules and text cleanup for generated posts.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum effective length of a post.
pub const TWEET_LIMIT: usize = 280;

/// Weight of every URL regardless of its real length.
pub const URL_WEIGHT: usize = 23;

const ELLIPSIS: &str = "...";

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

fn is_wide(c: char) -> bool {
    (c as u32) > 0xFFFF
}

fn is_variation_selector(c: char) -> bool {
    ('\u{FE00}'..='\u{FE0F}').contains(&c)
}

/// Length as the platform counts it.
///
/// Code points, with every URL counted as [`URL_WEIGHT`] and every code point
/// above U+FFFF counted twice.
pub fn effective_length(text: &str) -> usize {
    let mut length = text.chars().count();

    for url in URL_PATTERN.find_iter(text) {
        length = length - url.as_str().chars().count() + URL_WEIGHT;
    }

    length + text.chars().filter(|c| is_wide(*c)).count()
}

/// Shorten `text` to fit [`TWEET_LIMIT`], ending in `...` when cut.
pub fn truncate(text: &str) -> String {
    if effective_length(text) <= TWEET_LIMIT {
        return text.to_string();
    }

    let mut truncated = text.to_string();
    while !truncated.is_empty()
        && effective_length(&format!("{}{}", truncated, ELLIPSIS)) > TWEET_LIMIT
    {
        truncated.pop();
    }
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Drop code points above U+FFFF and variation selectors.
pub fn strip_non_bmp(text: &str) -> String {
    text.chars()
        .filter(|c| !is_wide(*c) && !is_variation_selector(*c))
        .collect()
}

/// Clean raw provider output into postable text.
pub fn sanitize(raw: &str) -> String {
    let stripped = strip_non_bmp(raw).replace('*', "");
    let unquoted = stripped.trim().trim_matches('"').trim();
    truncate(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_length_counts_urls_and_wide_chars() {
        assert_eq!(effective_length("Check http://example.com/a 😀"), 32);
        assert_eq!(effective_length("plain"), 5);
        assert_eq!(
            effective_length("https://example.com/a/very/long/path/that/goes/on"),
            URL_WEIGHT
        );
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("hello"), "hello");
        let exact = "a".repeat(TWEET_LIMIT);
        assert_eq!(truncate(&exact), exact);
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "word ".repeat(100);
        let cut = truncate(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(effective_length(&cut), TWEET_LIMIT);
        assert_eq!(truncate(&cut), cut);
    }

    #[test]
    fn test_truncate_wide_chars() {
        let long = "😀".repeat(200);
        let cut = truncate(&long);
        assert!(effective_length(&cut) <= TWEET_LIMIT);
        assert_eq!(truncate(&cut), cut);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  \"**Big** news today 😀\"  "), "Big news today");
        assert_eq!(sanitize("Sunny\u{FE0F} day"), "Sunny day");
        assert!(effective_length(&sanitize(&"x".repeat(400))) <= TWEET_LIMIT);
    }
}
