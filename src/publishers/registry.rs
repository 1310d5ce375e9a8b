//! The per-run aggregation registry
//!
//! Built once per run from the harvest results and read-only afterwards.
//! Column order follows the publisher table, then the gallery table.

use crate::rows::ContentType;

/// Classified URL sequences of one publisher column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherUrls {
    pub name: String,
    pub article: Vec<String>,
    pub video: Vec<String>,
}

impl PublisherUrls {
    pub fn new(name: impl Into<String>, article: Vec<String>, video: Vec<String>) -> Self {
        Self {
            name: name.into(),
            article,
            video,
        }
    }

    /// The sequence read during the pass for `content_type`
    ///
    /// Publishers carry no gallery sequence, so the gallery pass sees an
    /// empty slice.
    pub fn sequence(&self, content_type: ContentType) -> &[String] {
        match content_type {
            ContentType::Article => &self.article,
            ContentType::Video => &self.video,
            ContentType::Gallery => &[],
        }
    }
}

/// An image sitemap split into plain pages and galleries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryUrls {
    pub name: String,
    pub plain: Vec<String>,
    pub gallery: Vec<String>,
}

impl GalleryUrls {
    pub fn new(name: impl Into<String>, plain: Vec<String>, gallery: Vec<String>) -> Self {
        Self {
            name: name.into(),
            plain,
            gallery,
        }
    }
}

/// Every column's URL sequences for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    publishers: Vec<PublisherUrls>,
    galleries: Vec<GalleryUrls>,
}

impl Registry {
    pub fn new(publishers: Vec<PublisherUrls>, galleries: Vec<GalleryUrls>) -> Self {
        Self {
            publishers,
            galleries,
        }
    }

    pub fn publishers(&self) -> &[PublisherUrls] {
        &self.publishers
    }

    pub fn galleries(&self) -> &[GalleryUrls] {
        &self.galleries
    }

    /// Number of 9-cell groups in every output row
    pub fn column_count(&self) -> usize {
        self.publishers.len() + self.galleries.len()
    }

    /// Total URLs harvested across every sequence, before deduplication
    pub fn total_urls(&self) -> usize {
        let publishers: usize = self
            .publishers
            .iter()
            .map(|p| p.article.len() + p.video.len())
            .sum();
        let galleries: usize = self.galleries.iter().map(|g| g.gallery.len()).sum();
        publishers + galleries
    }
}
