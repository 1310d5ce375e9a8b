//! Publisher adapters and the aggregation registry

mod harvester;
mod registry;

use crate::feeds::FeedError;
use thiserror::Error;

pub use harvester::{classify_inline, Harvester};
pub use registry::{GalleryUrls, PublisherUrls, Registry};

/// Why a single source produced no URLs
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("no data from {0}")]
    Unavailable(String),

    #[error("malformed feed at {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: FeedError,
    },

    #[error("sitemap index {0} lists no dated sitemap")]
    EmptyIndex(String),

    #[error("pattern source {0} has no host")]
    MissingHost(String),
}
