//! Sitemap index resolution

use crate::feeds::xml::{read_entries, SITEMAP_INDEX};
use crate::feeds::FeedError;

/// Returns the child sitemap with the greatest `lastmod`
///
/// Entries missing either `loc` or `lastmod` are skipped. `lastmod` values
/// are compared as strings, which orders W3C datetimes correctly as long as
/// the publisher uses one format throughout. `Ok(None)` means the index is
/// valid but lists nothing usable.
pub fn latest_sitemap(body: &[u8]) -> Result<Option<String>, FeedError> {
    let entries = read_entries(body, SITEMAP_INDEX)?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| match (entry.loc, entry.lastmod) {
            (Some(loc), Some(lastmod)) if !loc.is_empty() && !lastmod.is_empty() => {
                Some((lastmod, loc))
            }
            _ => None,
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, loc)| loc))
}
