use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, ProviderEntry, RegistryConfig, SpeedTestConfig,
};
use crate::url::{clean_provider_url, parse_http_url};
use crate::ConfigError;

const MAX_DEPTH_LIMIT: u32 = 16;
const MAX_WORKERS: usize = 64;
const MIN_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_speed_test_config(&config.speed_test)?;
    validate_registry_config(&config.registry)?;
    validate_output_config(&config.output)?;
    validate_providers(&config.providers)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.page_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "page-timeout-ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.page_timeout_ms
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates throughput test configuration
fn validate_speed_test_config(config: &SpeedTestConfig) -> Result<(), ConfigError> {
    if config.duration_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "duration-ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.duration_ms
        )));
    }

    Ok(())
}

/// Validates registry configuration
fn validate_registry_config(config: &RegistryConfig) -> Result<(), ConfigError> {
    parse_http_url(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid registry endpoint '{}': {}",
            config.endpoint, e
        ))
    })?;

    if config.limit < 1 {
        return Err(ConfigError::Validation(
            "registry limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates statically configured providers
fn validate_providers(providers: &[ProviderEntry]) -> Result<(), ConfigError> {
    for entry in providers {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Provider with URL '{}' must have a name",
                entry.url
            )));
        }

        let cleaned = clean_provider_url(&entry.url);
        parse_http_url(&cleaned).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid URL '{}' for provider '{}': {}",
                entry.url, entry.name, e
            ))
        })?;
    }

    Ok(())
}
