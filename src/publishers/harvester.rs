//! Runs the publisher table against the network
//!
//! Each [`PublisherEntry`] is turned into two classified URL sequences and
//! each [`GalleryEntry`] into a plain/gallery split. Any failure is logged
//! and degrades to empty sequences; one broken publisher never stops the
//! others.

use crate::config::{
    AdapterSpec, Config, FeedFormat, GalleryEntry, PublisherEntry, SourceSpec, UrlRule,
};
use crate::feeds::{
    latest_sitemap, parse_listing, parse_urlset, partition_by_images, PatternScan, UrlFilter,
};
use crate::fetch::{Fetcher, ParsedFetch};
use crate::publishers::registry::{GalleryUrls, PublisherUrls, Registry};
use crate::publishers::HarvestError;

/// Harvests publisher and gallery sources one request at a time
#[derive(Debug, Clone)]
pub struct Harvester {
    fetcher: Fetcher,
}

impl Harvester {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Builds the registry for the whole table, in table order
    pub async fn build_registry(&self, config: &Config) -> Registry {
        let mut publishers = Vec::with_capacity(config.publishers.len());
        for entry in &config.publishers {
            publishers.push(self.harvest_publisher(entry).await);
        }

        let mut galleries = Vec::with_capacity(config.galleries.len());
        for entry in &config.galleries {
            galleries.push(self.harvest_gallery(entry).await);
        }

        let registry = Registry::new(publishers, galleries);
        tracing::info!(
            "Registry built: {} columns, {} URLs",
            registry.column_count(),
            registry.total_urls()
        );
        registry
    }

    /// Harvests one publisher column
    ///
    /// # Returns
    ///
    /// The article and video sequences. A source that cannot be fetched or
    /// parsed contributes an empty sequence.
    pub async fn harvest_publisher(&self, entry: &PublisherEntry) -> PublisherUrls {
        let (article, video) = match &entry.adapter {
            AdapterSpec::Inline {
                source,
                video_when,
                article_when,
            } => match self.harvest_source(source).await {
                Ok(urls) => classify_inline(urls, video_when, article_when),
                Err(e) => {
                    tracing::warn!("Extraction failed for {}: {}", entry.name, e);
                    (Vec::new(), Vec::new())
                }
            },
            AdapterSpec::Split { article, video } => (
                self.harvest_or_empty(&entry.name, "article", article).await,
                self.harvest_or_empty(&entry.name, "video", video).await,
            ),
        };

        tracing::info!(
            "{}: {} articles, {} videos",
            entry.name,
            article.len(),
            video.len()
        );

        PublisherUrls::new(entry.name.clone(), article, video)
    }

    /// Harvests one gallery column from an image sitemap
    pub async fn harvest_gallery(&self, entry: &GalleryEntry) -> GalleryUrls {
        let min_images = entry.min_images;
        let fetched = self
            .fetcher
            .fetch_parsed(&entry.url, |body| partition_by_images(body, min_images))
            .await;

        match settle(&entry.url, fetched) {
            Ok(split) => {
                tracing::info!(
                    "{}: {} galleries ({} single-image pages)",
                    entry.name,
                    split.gallery.len(),
                    split.plain.len()
                );
                GalleryUrls::new(entry.name.clone(), split.plain, split.gallery)
            }
            Err(e) => {
                tracing::warn!("Extraction failed for {}: {}", entry.name, e);
                GalleryUrls::new(entry.name.clone(), Vec::new(), Vec::new())
            }
        }
    }

    /// Fetches and parses a single source
    pub async fn harvest_source(&self, source: &SourceSpec) -> Result<Vec<String>, HarvestError> {
        let url = if source.resolve_index {
            self.resolve_index(&source.url).await?
        } else {
            source.url.clone()
        };
        let filter = UrlFilter::new(source.include.clone(), source.exclude.clone());

        match source.format {
            FeedFormat::Sitemap => {
                let fetched = self
                    .fetcher
                    .fetch_parsed(&url, |body| parse_urlset(body, &filter))
                    .await;
                settle(&url, fetched)
            }
            FeedFormat::Listing => {
                let text = self
                    .fetcher
                    .fetch_text(&url)
                    .await
                    .ok_or_else(|| HarvestError::Unavailable(url.clone()))?;
                Ok(parse_listing(&text, &filter))
            }
            FeedFormat::Pattern => {
                let host = source
                    .host
                    .as_deref()
                    .ok_or_else(|| HarvestError::MissingHost(url.clone()))?;
                let scan = PatternScan::new(
                    host,
                    filter,
                    source.require.clone(),
                    source.reject.clone(),
                )
                .map_err(|e| HarvestError::Malformed {
                    url: url.clone(),
                    source: e,
                })?;
                let text = self
                    .fetcher
                    .fetch_text(&url)
                    .await
                    .ok_or_else(|| HarvestError::Unavailable(url.clone()))?;
                Ok(scan.scan(&text))
            }
        }
    }

    /// Resolves a sitemap index to its most recently modified child
    async fn resolve_index(&self, index_url: &str) -> Result<String, HarvestError> {
        let fetched = self.fetcher.fetch_parsed(index_url, latest_sitemap).await;
        let latest = settle(index_url, fetched)?
            .ok_or_else(|| HarvestError::EmptyIndex(index_url.to_string()))?;
        tracing::debug!("Resolved sitemap index {} to {}", index_url, latest);
        Ok(latest)
    }

    async fn harvest_or_empty(
        &self,
        publisher: &str,
        category: &str,
        source: &SourceSpec,
    ) -> Vec<String> {
        match self.harvest_source(source).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::warn!("Extraction failed for {} {}: {}", publisher, category, e);
                Vec::new()
            }
        }
    }
}

fn settle<T>(url: &str, fetched: ParsedFetch<T>) -> Result<T, HarvestError> {
    match fetched {
        ParsedFetch::Parsed(value) => Ok(value),
        ParsedFetch::Unavailable => Err(HarvestError::Unavailable(url.to_string())),
        ParsedFetch::Malformed(e) => Err(HarvestError::Malformed {
            url: url.to_string(),
            source: e,
        }),
    }
}

/// Splits one source into (article, video)
///
/// A URL matching any `video_when` rule is a video. Every other URL is an
/// article, narrowed to those matching an `article_when` rule when any are
/// given.
pub fn classify_inline(
    urls: Vec<String>,
    video_when: &[UrlRule],
    article_when: &[UrlRule],
) -> (Vec<String>, Vec<String>) {
    let (video, rest): (Vec<String>, Vec<String>) = urls
        .into_iter()
        .partition(|url| video_when.iter().any(|rule| rule.matches(url)));

    let article = if article_when.is_empty() {
        rest
    } else {
        rest.into_iter()
            .filter(|url| article_when.iter().any(|rule| rule.matches(url)))
            .collect()
    };

    (article, video)
}
