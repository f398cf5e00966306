//! Configuration module for Sumi-Linkcheck
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every value has a default, so a config file is optional; command-line flags
//! are layered on top before validation.
//!
//! # Example
//!
//! ```no_run
//! use sumi_linkcheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkcheck.toml")).unwrap();
//! println!("Checker will use max depth: {}", config.crawl.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::validate;
