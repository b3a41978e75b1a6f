use crate::config::types::{Config, FetcherConfig, GovernorConfig, HeaderConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_governor_config(&config.governor)?;
    validate_header_config(&config.headers)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.retry_times < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-times must be >= 1, got {}",
            config.retry_times
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

fn validate_governor_config(config: &GovernorConfig) -> Result<(), ConfigError> {
    if config.max_at_once < 1 || config.max_at_once > 64 {
        return Err(ConfigError::Validation(format!(
            "max-at-once must be between 1 and 64, got {}",
            config.max_at_once
        )));
    }

    if config.max_per_second < 1 {
        return Err(ConfigError::Validation(format!(
            "max-per-second must be >= 1, got {}",
            config.max_per_second
        )));
    }

    Ok(())
}

fn validate_header_config(config: &HeaderConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if !config.referer.is_empty() {
        Url::parse(&config.referer)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer: {}", e)))?;
    }

    Ok(())
}
