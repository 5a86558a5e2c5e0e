//! Headline fetching for the research step.
//!
//! A source URL is fetched once per attempt. The body is parsed as an
//! RSS/Atom feed first; when it is not a feed (or has no entries) headline-like
//! elements are scraped from the HTML instead.

mod config;
mod error;
mod fetcher;
pub mod parse;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use fetcher::HeadlineFetcher;
