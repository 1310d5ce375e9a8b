//! Plain-text URL listings

use crate::feeds::{dedupe_preserving_order, UrlFilter};

/// Parses a one-URL-per-line listing
///
/// The filter is tested against the lowercased line while the original
/// spelling is kept in the output. Blank lines are dropped.
pub fn parse_listing(text: &str, filter: &UrlFilter) -> Vec<String> {
    dedupe_preserving_order(text.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || !filter.accepts(&line.to_lowercase()) {
            return None;
        }
        Some(line.to_string())
    }))
}
