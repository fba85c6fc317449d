//! Configuration module for Snapshot-Scout
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file, [`Config::default`] carries the
//! reference crawl and test constants.
//!
//! # Example
//!
//! ```no_run
//! use snapshot_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, ProviderEntry, RegistryConfig, SpeedTestConfig,
    DEFAULT_REGISTRY_ENDPOINT, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_optional_config, parse_config};
pub use validation::validate;
