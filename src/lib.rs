//! Sumi-Linkcheck: a bounded broken link checker
//!
//! This crate crawls a single website breadth-first under depth and page
//! budgets, classifies every link it finds, verifies link liveness with a
//! HEAD→GET fallback and bounded retries, and produces a deterministic,
//! severity-ordered list of failures.

pub mod checker;
pub mod config;
pub mod crawler;
pub mod output;
pub mod results;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Linkcheck operations
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sumi-Linkcheck operations
pub type Result<T> = std::result::Result<T, LinkCheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use checker::{CheckObserver, ExecutionStrategy, LinkVerifier};
pub use config::{Config, CrawlConfig};
pub use crawler::{BasePageStatus, CheckReport, LinkChecker, RunState};
pub use results::ResultAggregator;
pub use state::{LinkRecord, LinkType, Severity, StatusOutcome};
pub use url::{canonicalize, classify_link, ClassifiedLink};
