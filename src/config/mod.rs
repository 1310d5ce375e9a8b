//! Configuration module for Sitemap-Sweep
//!
//! This module handles loading, parsing, and validating the TOML publisher
//! table together with retry, row and audit settings.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_sweep::config::load_default_config;
//!
//! let config = load_default_config().unwrap();
//! println!("Rows per cycle: {}", config.rows.max_rows_per_cycle);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AdapterSpec, AuditConfig, Config, DedupSeed, ExhaustedPolicy, FeedFormat, FetchConfig,
    GalleryEntry, PublisherEntry, RowsConfig, SourceSpec, StoreConfig, UrlRule, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_default_config, parse_config,
    DEFAULT_CONFIG,
};
