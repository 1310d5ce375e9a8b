//! Sitemap-Sweep: a news sitemap aggregator
//!
//! This crate collects freshly published article, video and gallery URLs from
//! publisher sitemaps and feeds, deduplicates them, lays them out in fixed
//! 9-cell column groups of a tabular store, and later fills in page
//! performance metrics for every pending URL.

pub mod audit;
pub mod config;
pub mod feeds;
pub mod fetch;
pub mod output;
pub mod publishers;
pub mod rows;
pub mod store;
pub mod sweep;

use thiserror::Error;

/// Errors that stop a run before either phase starts
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Duplicate source name: {0}")]
    DuplicateName(String),
}

/// Result type alias for Sitemap-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use publishers::{Harvester, Registry};
pub use rows::{build_rows, ContentType, DedupWindow, Row, RowPlan};
pub use store::{MemorySheet, SqliteSheet, TabularStore};
