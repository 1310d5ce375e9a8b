use serde::Deserialize;

/// Main configuration structure for Sitemap-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub rows: RowsConfig,
    pub audit: AuditConfig,
    pub store: StoreConfig,
    #[serde(default, rename = "publisher")]
    pub publishers: Vec<PublisherEntry>,
    #[serde(default, rename = "gallery")]
    pub galleries: Vec<GalleryEntry>,
}

/// Fetcher retry and timeout settings
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Attempts per request (and per fetch-parse cycle)
    pub retries: u32,

    /// Pause between attempts (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Row assembly settings
#[derive(Debug, Clone, Deserialize)]
pub struct RowsConfig {
    /// Positions read from every sequence per content type
    #[serde(rename = "max-rows-per-cycle")]
    pub max_rows_per_cycle: usize,

    /// What an exhausted sequence offers
    #[serde(default)]
    pub exhausted: ExhaustedPolicy,

    /// Where the dedup window starts from
    #[serde(default)]
    pub dedup: DedupSeed,
}

/// Behavior of a sequence read past its end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExhaustedPolicy {
    /// Emit a blank group
    #[default]
    Blank,
    /// Re-offer the last element (still subject to the seen-check)
    RepeatLast,
}

/// Seed policy for the dedup window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupSeed {
    /// Seeded from every URL already present in the store
    #[default]
    Historical,
    /// Starts empty on every run
    RunOnly,
}

/// Performance audit settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Lighthouse executable
    #[serde(default = "default_lighthouse")]
    pub command: String,

    /// Value passed to `--chrome-flags`
    #[serde(rename = "chrome-flags", default = "default_chrome_flags")]
    pub chrome_flags: String,

    pub retries: u32,

    #[serde(rename = "delay-seconds")]
    pub delay_seconds: u64,

    /// Pause after every tool invocation
    #[serde(rename = "throttle-seconds")]
    pub throttle_seconds: u64,
}

fn default_lighthouse() -> String {
    "lighthouse".to_string()
}

fn default_chrome_flags() -> String {
    "--headless".to_string()
}

/// Tabular store location
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Worksheet name inside the database
    pub worksheet: String,
}

/// One publisher column in the output rows
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherEntry {
    /// Display name, unique across publishers and galleries
    pub name: String,

    #[serde(flatten)]
    pub adapter: AdapterSpec,
}

/// The shape of a publisher adapter
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum AdapterSpec {
    /// One source, classified URL by URL
    Inline {
        source: SourceSpec,
        #[serde(rename = "video-when")]
        video_when: Vec<UrlRule>,
        #[serde(rename = "article-when", default)]
        article_when: Vec<UrlRule>,
    },

    /// One source per category
    Split {
        article: SourceSpec,
        video: SourceSpec,
    },
}

/// A single document to harvest URLs from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub url: String,

    #[serde(default)]
    pub format: FeedFormat,

    /// `url` points at a sitemap index; harvest its most recent child instead
    #[serde(rename = "resolve-index", default)]
    pub resolve_index: bool,

    /// Keep URLs containing any of these substrings
    #[serde(default)]
    pub include: Vec<String>,

    /// Drop URLs containing any of these substrings
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Host the pattern scan is anchored to (pattern format only)
    #[serde(default)]
    pub host: Option<String>,

    /// Every rule must match (pattern format only)
    #[serde(default)]
    pub require: Vec<UrlRule>,

    /// Any matching rule drops the URL (pattern format only)
    #[serde(default)]
    pub reject: Vec<UrlRule>,
}

/// Document format of a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedFormat {
    #[default]
    Sitemap,
    Listing,
    Pattern,
}

/// A predicate over a URL string
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlRule {
    Contains(String),
    EndsWith(String),
    /// Text after the final `/` equals the value
    LastSegment(String),
}

impl UrlRule {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Contains(needle) => url.contains(needle.as_str()),
            Self::EndsWith(suffix) => url.ends_with(suffix.as_str()),
            Self::LastSegment(segment) => url.rsplit('/').next() == Some(segment.as_str()),
        }
    }
}

/// An image sitemap whose multi-image entries become a gallery column
#[derive(Debug, Clone, Deserialize)]
pub struct GalleryEntry {
    pub name: String,
    pub url: String,

    /// Entries with at least this many images are galleries
    #[serde(rename = "min-images", default = "default_min_images")]
    pub min_images: usize,
}

fn default_min_images() -> usize {
    2
}
