//! Fetch module for resilient HTTP retrieval
//!
//! This module contains:
//! - The shared retry/backoff utility
//! - The HTTP fetcher with gzip fallback
//! - The fetch-and-parse wrapper used by every XML adapter

mod fetcher;
mod retry;

pub use fetcher::{build_http_client, maybe_gunzip, Fetcher, ParsedFetch};
pub use retry::RetryPolicy;
