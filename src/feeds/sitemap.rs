//! `urlset` sitemap parsing

use crate::feeds::xml::{read_entries, URLSET};
use crate::feeds::{dedupe_preserving_order, FeedError, UrlFilter};

/// Extracts every page `<loc>` of a `urlset` document
///
/// # Arguments
///
/// * `body` - The raw (already decompressed) document
/// * `filter` - Include/exclude substrings applied to each URL
///
/// # Returns
///
/// URLs in document order, first occurrence kept, or an error when the
/// document is not a well-formed sitemaps.org `urlset`.
pub fn parse_urlset(body: &[u8], filter: &UrlFilter) -> Result<Vec<String>, FeedError> {
    let entries = read_entries(body, URLSET)?;

    Ok(dedupe_preserving_order(
        entries
            .into_iter()
            .filter_map(|entry| entry.loc)
            .filter(|loc| !loc.is_empty() && filter.accepts(loc)),
    ))
}

/// An image sitemap split by image count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSplit {
    /// Pages with fewer than `min_images` images
    pub plain: Vec<String>,
    /// Pages with at least `min_images` images
    pub gallery: Vec<String>,
}

/// Partitions the pages of an image sitemap into plain pages and galleries
pub fn partition_by_images(body: &[u8], min_images: usize) -> Result<ImageSplit, FeedError> {
    let entries = read_entries(body, URLSET)?;

    let mut plain = Vec::new();
    let mut gallery = Vec::new();
    for entry in entries {
        let Some(loc) = entry.loc.filter(|loc| !loc.is_empty()) else {
            continue;
        };
        if entry.images >= min_images {
            gallery.push(loc);
        } else {
            plain.push(loc);
        }
    }

    Ok(ImageSplit {
        plain: dedupe_preserving_order(plain),
        gallery: dedupe_preserving_order(gallery),
    })
}
