//! Feed parsers
//!
//! Pure functions turning a fetched document into an ordered, deduplicated
//! list of URLs:
//! - `sitemap`: sitemaps.org `urlset` documents, with or without image data
//! - `index`: `sitemapindex` documents, resolved to their newest child
//! - `listing`: plain text, one URL per line
//! - `pattern`: host-anchored URL scan over arbitrary text

pub mod index;
pub mod listing;
pub mod pattern;
pub mod sitemap;
mod xml;

use std::collections::HashSet;
use thiserror::Error;

pub use index::latest_sitemap;
pub use listing::parse_listing;
pub use pattern::PatternScan;
pub use sitemap::{parse_urlset, partition_by_images, ImageSplit};

/// Errors raised while parsing a feed document
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("expected <{expected}> document, found <{found}>")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    #[error("document has no root element")]
    MissingRoot,

    #[error("document ended before its root element was closed")]
    Truncated,

    #[error("invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Substring include/exclude filter
///
/// A URL passes when it contains any `include` substring (or `include` is
/// empty) and none of the `exclude` substrings. Matching is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl UrlFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        let included = self.include.is_empty()
            || self
                .include
                .iter()
                .any(|needle| candidate.contains(needle.as_str()));

        included
            && !self
                .exclude
                .iter()
                .any(|needle| candidate.contains(needle.as_str()))
    }
}

/// Removes duplicates, keeping the first occurrence of each URL
pub fn dedupe_preserving_order<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
