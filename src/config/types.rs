use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for cwm-harvest
///
/// Every section and key is optional; missing values fall back to the
/// built-in defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetcher: FetcherConfig,
    pub governor: GovernorConfig,
    pub headers: HeaderConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL every page path is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ciweimao.com".to_string(),
        }
    }
}

/// Retry, timeout and pacing policy of the page fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Number of attempts made for a single page
    #[serde(rename = "retry-times")]
    pub retry_times: u32,

    /// Wall-clock timeout for one attempt (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Lower bound of the random pause before every attempt (milliseconds)
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the random pause before every attempt (milliseconds)
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    /// Fixed pause after a transport failure (milliseconds)
    #[serde(rename = "transport-backoff-ms")]
    pub transport_backoff_ms: u64,

    /// Pause step after an HTTP 503, multiplied by the attempt number (milliseconds)
    #[serde(rename = "unavailable-backoff-ms")]
    pub unavailable_backoff_ms: u64,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn transport_backoff(&self) -> Duration {
        Duration::from_millis(self.transport_backoff_ms)
    }

    /// Pause applied after a 503 on the zero-based attempt `attempt_index`
    pub fn unavailable_backoff(&self, attempt_index: u32) -> Duration {
        Duration::from_millis(
            self.unavailable_backoff_ms
                .saturating_mul(u64::from(attempt_index) + 1),
        )
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            retry_times: 3,
            timeout_secs: 10,
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            transport_backoff_ms: 5000,
            unavailable_backoff_ms: 5000,
        }
    }
}

/// Fan-out limits for batches of chapter fetches
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Maximum number of tasks in flight
    #[serde(rename = "max-at-once")]
    pub max_at_once: usize,

    /// Maximum number of task starts per second
    #[serde(rename = "max-per-second")]
    pub max_per_second: u32,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            max_at_once: 5,
            max_per_second: 2,
        }
    }
}

/// Browser-like request headers sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    pub referer: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "zh-CN,zh;q=0.8,zh-TW;q=0.7,zh-HK;q=0.5,en-US;q=0.3,en;q=0.2"
                .to_string(),
            referer: "https://www.ciweimao.com/".to_string(),
        }
    }
}
