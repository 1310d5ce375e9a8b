//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made while harvesting, including:
//! - Building the HTTP client with a proper user agent string
//! - Bounded retries for non-200 responses and transport errors
//! - Transparent gzip decompression of `.xml.gz` style payloads
//! - Re-running fetch and parse together when a payload is corrupt

use crate::config::{FetchConfig, UserAgentConfig};
use crate::feeds::FeedError;
use crate::fetch::retry::RetryPolicy;
use flate2::read::MultiGzDecoder;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::io::Read;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use sitemap_sweep::config::UserAgentConfig;
/// use sitemap_sweep::fetch::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "SitemapSweep".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Why a single attempt failed
#[derive(Debug)]
enum AttemptError {
    Status(StatusCode),
    Transport(reqwest::Error),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "unexpected status {}", status),
            Self::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

/// Outcome of a fetch-and-parse cycle
#[derive(Debug)]
pub enum ParsedFetch<T> {
    /// The payload was fetched and parsed
    Parsed(T),
    /// Every fetch attempt failed
    Unavailable,
    /// The payload could be fetched but never parsed
    Malformed(FeedError),
}

/// Resilient GET client
///
/// Every request is retried per the configured [`RetryPolicy`]; only an
/// HTTP 200 counts as success. Exhausted retries are reported as "no data"
/// rather than an error.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds a fetcher from the `[fetch]` and `[user-agent]` sections
    pub fn from_config(
        fetch: &FetchConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, Duration::from_secs(fetch.timeout_seconds))?;
        Ok(Self::new(
            client,
            RetryPolicy::from_secs(fetch.retries, fetch.delay_seconds),
        ))
    }

    /// Fetches `url`, returning the (decompressed) body or `None` once every
    /// attempt has failed
    pub async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let result = self
            .policy
            .run(move |attempt| self.attempt(url, attempt), |_| true)
            .await;

        match result {
            Ok(body) => Some(maybe_gunzip(body)),
            Err(e) => {
                tracing::warn!(
                    "Giving up on {} after {} attempts: {}",
                    url,
                    self.policy.attempts,
                    e
                );
                None
            }
        }
    }

    /// Fetches `url` as (lossy UTF-8) text
    pub async fn fetch_text(&self, url: &str) -> Option<String> {
        self.fetch(url)
            .await
            .map(|body| String::from_utf8_lossy(&body).into_owned())
    }

    /// Runs fetch → parse as one unit, re-attempting the whole cycle when the
    /// payload fails to parse
    ///
    /// Transport exhaustion is not re-attempted here; [`Fetcher::fetch`] has
    /// already used its retries.
    pub async fn fetch_parsed<T, F>(&self, url: &str, parse: F) -> ParsedFetch<T>
    where
        F: Fn(&[u8]) -> Result<T, FeedError>,
    {
        let parse = &parse;
        let result = self
            .policy
            .run(
                move |attempt| async move {
                    let body = self.fetch(url).await.ok_or(CycleError::Unavailable)?;
                    parse(body.as_slice()).map_err(|e| {
                        tracing::debug!(
                            "Payload from {} did not parse (attempt {}): {}",
                            url,
                            attempt,
                            e
                        );
                        CycleError::Malformed(e)
                    })
                },
                |e| matches!(e, CycleError::Malformed(_)),
            )
            .await;

        match result {
            Ok(parsed) => ParsedFetch::Parsed(parsed),
            Err(CycleError::Unavailable) => ParsedFetch::Unavailable,
            Err(CycleError::Malformed(e)) => {
                tracing::warn!("Payload from {} never parsed: {}", url, e);
                ParsedFetch::Malformed(e)
            }
        }
    }

    async fn attempt(&self, url: &str, attempt: u32) -> Result<Vec<u8>, AttemptError> {
        tracing::debug!("GET {} (attempt {})", url, attempt);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptError::Status(status));
        }

        let body = response.bytes().await.map_err(AttemptError::Transport)?;
        Ok(body.to_vec())
    }
}

#[derive(Debug)]
enum CycleError {
    Unavailable,
    Malformed(FeedError),
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "no data"),
            Self::Malformed(e) => write!(f, "{}", e),
        }
    }
}

/// Decompresses a gzip payload, or returns it unchanged when it is not gzip
///
/// Concatenated gzip members are all inflated, in order.
pub fn maybe_gunzip(payload: Vec<u8>) -> Vec<u8> {
    if payload.is_empty() {
        return payload;
    }

    let mut inflated = Vec::new();
    match MultiGzDecoder::new(payload.as_slice()).read_to_end(&mut inflated) {
        Ok(_) => inflated,
        Err(_) => payload,
    }
}
