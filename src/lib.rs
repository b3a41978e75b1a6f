//! cwm-harvest: a polite scraper for Ciweimao book and chapter metadata
//!
//! This crate fetches chapter-index, chapter, book and search pages from the
//! Ciweimao web-novel site under bounded concurrency, extracts structured
//! records from the static HTML, and hands them to presentation layers.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod site;

use thiserror::Error;

/// Main error type for cwm-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {message}")]
    Header { name: String, message: String },
}

impl HarvestError {
    /// Wraps a reqwest error raised while talking to `url`
    pub fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            HarvestError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = source.status() {
            HarvestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            HarvestError::Http {
                url: url.to_string(),
                source,
            }
        }
    }
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

/// Result type alias for cwm-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchOutcome, Fetcher, Governor, Harvester, SearchLookup};
pub use model::{BookDetail, ChapterDetail, ChapterRef, Metric, SearchResultItem};
