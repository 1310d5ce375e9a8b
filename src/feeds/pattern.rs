//! Host-anchored URL scanning
//!
//! Some publishers only expose a sitemap that does not parse reliably. For
//! those the raw text is scanned for anything that looks like a URL on the
//! publisher's host, then narrowed down with URL rules.

use crate::config::UrlRule;
use crate::feeds::{dedupe_preserving_order, FeedError, UrlFilter};
use regex::Regex;

/// A compiled scan for one source
#[derive(Debug, Clone)]
pub struct PatternScan {
    matcher: Regex,
    filter: UrlFilter,
    require: Vec<UrlRule>,
    reject: Vec<UrlRule>,
}

impl PatternScan {
    /// Compiles `https?://<host>[^\s"<]+` for `host`
    ///
    /// # Arguments
    ///
    /// * `host` - Host name the URLs must start with, matched literally
    /// * `filter` - Include/exclude substrings
    /// * `require` - Rules that must all match
    /// * `reject` - Rules of which none may match
    pub fn new(
        host: &str,
        filter: UrlFilter,
        require: Vec<UrlRule>,
        reject: Vec<UrlRule>,
    ) -> Result<Self, FeedError> {
        let matcher = Regex::new(&format!(r#"https?://{}[^\s"<]+"#, regex::escape(host)))?;
        Ok(Self {
            matcher,
            filter,
            require,
            reject,
        })
    }

    /// Scans `text`, returning accepted URLs in order of first appearance
    pub fn scan(&self, text: &str) -> Vec<String> {
        dedupe_preserving_order(
            self.matcher
                .find_iter(text)
                .map(|m| m.as_str())
                .filter(|url| self.accepts(url))
                .map(str::to_string),
        )
    }

    fn accepts(&self, url: &str) -> bool {
        self.filter.accepts(url)
            && self.require.iter().all(|rule| rule.matches(url))
            && !self.reject.iter().any(|rule| rule.matches(url))
    }
}
