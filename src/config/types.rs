use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Linkcheck
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl and verification behavior
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// URL the crawl starts from; its host defines what is internal
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum link hops from the base page that will be fetched
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages fetched during traversal
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Timeout for a single network attempt (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Extra attempts allowed after a transient failure
    pub retries: u32,

    /// Probe links with HEAD before falling back to GET
    #[serde(rename = "use-head")]
    pub use_head: bool,

    /// Maximum number of link checks in flight (1 = sequential)
    #[serde(rename = "concurrency-limit")]
    pub concurrency_limit: usize,

    /// Base delay before the first retry, doubled on each further retry (milliseconds)
    #[serde(rename = "backoff-ms")]
    pub backoff_ms: u64,
}

impl CrawlConfig {
    /// Creates a configuration for the given base URL with default budgets
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base retry backoff
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_depth: 2,
            max_pages: 100,
            timeout_ms: 5_000,
            retries: 1,
            use_head: true,
            concurrency_limit: 1,
            backoff_ms: 500,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the checker
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the checker
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sumi-linkcheck".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV report; Markdown and JSON reports are written next to it
    pub path: String,

    /// Exit non-zero when any broken link is found
    #[serde(rename = "fail-on-broken")]
    pub fail_on_broken: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "broken_links.csv".to_string(),
            fail_on_broken: false,
        }
    }
}
