//! Headline extraction from feed and HTML bodies.

use scraper::{ElementRef, Html, Selector};

/// Elements considered headline candidates.
const CANDIDATE_SELECTOR: &str = "h1, h2, h3, a";

/// Used when no candidate carries a headline-ish class.
const FALLBACK_SELECTOR: &str = "article h1, article h2, .post h1, .post h2, .entry h1, .entry h2";

/// Class name fragments that mark headline elements.
const HEADLINE_CLASS_PATTERNS: [&str; 5] =
    ["title", "headline", "post-title", "entry-title", "news-title"];

/// Titles of the first `max_items` feed entries.
///
/// Returns `None` when the body is not an RSS/Atom/JSON feed or the feed has
/// no entries.
pub fn parse_feed(body: &[u8], max_items: usize) -> Option<Vec<String>> {
    let feed = feed_rs::parser::parse(body).ok()?;
    if feed.entries.is_empty() {
        return None;
    }

    let titles = feed
        .entries
        .into_iter()
        .take(max_items)
        .filter_map(|entry| entry.title)
        .map(|title| collapse_whitespace(&title.content))
        .filter(|title| !title.is_empty())
        .collect();

    Some(titles)
}

/// Headline-like texts scraped from an HTML page, in document order.
///
/// Texts shorter than `min_chars` characters are dropped and duplicates
/// keep their first occurrence.
pub fn scrape_headlines(html: &str, min_chars: usize) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut headlines = select_texts(&document, CANDIDATE_SELECTOR, Some(has_headline_class));
    if headlines.is_empty() {
        headlines = select_texts(&document, FALLBACK_SELECTOR, None);
    }

    let mut seen = std::collections::HashSet::new();
    headlines
        .into_iter()
        .filter(|text| text.chars().count() >= min_chars)
        .filter(|text| seen.insert(text.clone()))
        .collect()
}

fn select_texts(
    document: &Html,
    selector: &str,
    keep: Option<fn(&ElementRef<'_>) -> bool>,
) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| keep.map_or(true, |keep| keep(element)))
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
        .collect()
}

fn has_headline_class(element: &ElementRef<'_>) -> bool {
    element.value().classes().any(|class| {
        HEADLINE_CLASS_PATTERNS
            .iter()
            .any(|pattern| class.contains(pattern))
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
