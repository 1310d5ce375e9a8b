use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// The publisher table shipped with the binary
pub const DEFAULT_CONFIG: &str = include_str!("../../config/sitemaps.toml");

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitemap_sweep::config::load_config;
///
/// let config = load_config(Path::new("sitemaps.toml")).unwrap();
/// println!("Publishers: {}", config.publishers.len());
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Loads the built-in publisher table
pub fn load_default_config() -> ConfigResult<Config> {
    parse_config(DEFAULT_CONFIG)
}

/// Computes a hex-encoded SHA-256 hash of configuration text
///
/// Logged at startup so two runs can be told apart by the table they used.
pub fn compute_config_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Loads a configuration (from `path`, or the built-in table) and returns it
/// together with its hash
pub fn load_config_with_hash(path: Option<&Path>) -> ConfigResult<(Config, String)> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_CONFIG.to_string(),
    };
    let config = parse_config(&content)?;
    Ok((config, compute_config_hash(&content)))
}
