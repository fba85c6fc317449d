use serde::Deserialize;
use std::time::Duration;

/// Browser-like identification; several providers refuse non-browser agents.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/91.0.4472.124 Safari/537.36",
);

/// Public WAX API node used to read the producer registry
pub const DEFAULT_REGISTRY_ENDPOINT: &str = "https://wax.qaraqol.com";

/// Main configuration structure for Snapshot-Scout
///
/// Every section is optional; a missing file or section yields the
/// reference constants.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "speed-test", default)]
    pub speed_test: SpeedTestConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Static provider list; when non-empty the registry is not queried
    #[serde(rename = "provider", default)]
    pub providers: Vec<ProviderEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum recursive hops from a provider's entry URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Per-request deadline for page fetches (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Number of providers located concurrently
    pub workers: usize,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            page_timeout_ms: 15_000,
            workers: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }
}

/// Throughput test configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeedTestConfig {
    /// Length of the measurement window (milliseconds)
    #[serde(rename = "duration-ms")]
    pub duration_ms: u64,

    /// Extra time allowed on top of the window before the request times out
    #[serde(rename = "timeout-grace-ms")]
    pub timeout_grace_ms: u64,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            duration_ms: 10_000,
            timeout_grace_ms: 5_000,
        }
    }
}

impl SpeedTestConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn timeout_grace(&self) -> Duration {
        Duration::from_millis(self.timeout_grace_ms)
    }
}

/// On-chain producer registry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the chain API node
    pub endpoint: String,

    /// Maximum number of registry rows to read
    pub limit: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REGISTRY_ENDPOINT.to_string(),
            limit: 100,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the JSON report is written into
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

/// Statically configured snapshot provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEntry {
    /// Provider (producer account) name
    pub name: String,

    /// Entry-point URL of the provider's snapshot site
    pub url: String,
}
