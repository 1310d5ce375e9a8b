use crate::config::types::{
    AdapterSpec, AuditConfig, Config, FeedFormat, FetchConfig, GalleryEntry, PublisherEntry,
    RowsConfig, SourceSpec, StoreConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_rows_config(&config.rows)?;
    validate_audit_config(&config.audit)?;
    validate_store_config(&config.store)?;
    validate_names(&config.publishers, &config.galleries)?;

    for publisher in &config.publishers {
        validate_publisher(publisher)?;
    }
    for gallery in &config.galleries {
        validate_gallery(gallery)?;
    }

    Ok(())
}

fn validate_retries(section: &str, retries: u32, delay_seconds: u64) -> Result<(), ConfigError> {
    if !(1..=10).contains(&retries) {
        return Err(ConfigError::Validation(format!(
            "{}.retries must be between 1 and 10, got {}",
            section, retries
        )));
    }

    if delay_seconds > 60 {
        return Err(ConfigError::Validation(format!(
            "{}.delay-seconds must be <= 60, got {}",
            section, delay_seconds
        )));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    validate_retries("fetch", config.retries, config.delay_seconds)?;

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "fetch.timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    if !config.contact_email.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            config.contact_email
        )));
    }

    Ok(())
}

fn validate_rows_config(config: &RowsConfig) -> Result<(), ConfigError> {
    if !(1..=1000).contains(&config.max_rows_per_cycle) {
        return Err(ConfigError::Validation(format!(
            "max-rows-per-cycle must be between 1 and 1000, got {}",
            config.max_rows_per_cycle
        )));
    }
    Ok(())
}

fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    validate_retries("audit", config.retries, config.delay_seconds)?;

    if config.command.trim().is_empty() {
        return Err(ConfigError::Validation(
            "audit.command cannot be empty".to_string(),
        ));
    }

    if config.throttle_seconds > 60 {
        return Err(ConfigError::Validation(format!(
            "audit.throttle-seconds must be <= 60, got {}",
            config.throttle_seconds
        )));
    }

    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.worksheet.is_empty() {
        return Err(ConfigError::Validation(
            "worksheet cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Column names must be unique across publishers and galleries
fn validate_names(
    publishers: &[PublisherEntry],
    galleries: &[GalleryEntry],
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let names = publishers
        .iter()
        .map(|p| p.name.as_str())
        .chain(galleries.iter().map(|g| g.name.as_str()));

    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }
    }

    Ok(())
}

fn validate_publisher(entry: &PublisherEntry) -> Result<(), ConfigError> {
    match &entry.adapter {
        AdapterSpec::Inline {
            source, video_when, ..
        } => {
            if video_when.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Publisher '{}' uses the inline shape but has no video-when rules",
                    entry.name
                )));
            }
            validate_source(&entry.name, source)
        }
        AdapterSpec::Split { article, video } => {
            validate_source(&entry.name, article)?;
            validate_source(&entry.name, video)
        }
    }
}

fn validate_source(name: &str, source: &SourceSpec) -> Result<(), ConfigError> {
    validate_http_url(name, &source.url)?;

    if source.format == FeedFormat::Pattern {
        match source.host.as_deref() {
            Some(host) if !host.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "Publisher '{}' has a pattern source without a host",
                    name
                )))
            }
        }
    }

    Ok(())
}

fn validate_gallery(entry: &GalleryEntry) -> Result<(), ConfigError> {
    validate_http_url(&entry.name, &entry.url)?;

    if entry.min_images < 1 {
        return Err(ConfigError::Validation(format!(
            "Gallery '{}' min-images must be >= 1",
            entry.name
        )));
    }

    Ok(())
}

fn validate_http_url(name: &str, raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}' for '{}': {}", raw, name, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' for '{}' must use http or https",
            raw, name
        )));
    }

    Ok(())
}
