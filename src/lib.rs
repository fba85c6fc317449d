//! Snapshot-Scout: finds WAX snapshot archives and measures how fast they download
//!
//! For every snapshot provider, a bounded-depth crawler walks the provider's site
//! looking for the most plausible snapshot archive URL. Every URL found is then
//! downloaded for a fixed window to estimate throughput, and the results are
//! assembled into a ranked report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod speedtest;
pub mod url;

use thiserror::Error;

/// Main error type for Snapshot-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider registry error: {0}")]
    Registry(#[from] providers::RegistryError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

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

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Snapshot-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    Link, LinkScorer, PageLoader, PatternClassifier, SnapshotCandidate, SnapshotLocator,
};
pub use providers::Provider;
pub use speedtest::{SpeedTestResult, TestStatus, ThroughputTester};
pub use crate::url::{extract_domain, SitePolicy};
