//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with browser-like headers
//! - Randomized pacing before every attempt
//! - Retry logic for transient failures and HTTP 503
//! - Error classification

use crate::config::{Config, FetcherConfig};
use crate::HarvestError;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
///
/// A fetch never returns an error; every failure mode is one of these
/// variants, and callers that only want the page use [`FetchOutcome::into_body`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
        /// Number of attempts used, including the successful one
        attempts: u32,
    },

    /// Every attempt hit a transient failure (HTTP 503, timeout, connection error)
    Exhausted {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        last_error: String,
    },

    /// A non-retryable error ended the fetch immediately
    Failed {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Returns the page body, or `None` for any failure
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// How a failed attempt is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// Retry after the transport backoff
    Transient,
    /// Give up immediately
    Fatal,
}

/// Builds an HTTP client with the configured browser-like headers
///
/// # Arguments
///
/// * `config` - The harvester configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(HarvestError)` - A header value was invalid or the client failed to build
pub fn build_http_client(config: &Config) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, ACCEPT, &config.headers.accept)?;
    insert_header(&mut headers, ACCEPT_LANGUAGE, &config.headers.accept_language)?;
    insert_header(&mut headers, REFERER, &config.headers.referer)?;

    let client = Client::builder()
        .user_agent(config.headers.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.fetcher.timeout())
        .connect_timeout(config.fetcher.timeout())
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

fn insert_header(
    headers: &mut HeaderMap,
    name: HeaderName,
    value: &str,
) -> Result<(), HarvestError> {
    if value.is_empty() {
        return Ok(());
    }
    let value = HeaderValue::from_str(value).map_err(|e| HarvestError::Header {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    headers.insert(name, value);
    Ok(())
}

/// Page fetcher with pacing, timeout and retry
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Every attempt | Sleep a random delay in `[min-delay, max-delay]` first |
/// | HTTP 503 | Sleep `(attempt + 1) * unavailable-backoff`, try again |
/// | Timeout / connection / other HTTP error | Sleep `transport-backoff`, try again |
/// | Transport failure on the last attempt | Give up → `Exhausted` |
/// | Anything else | Give up immediately → `Failed` |
///
/// All sleeps suspend only the calling task.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: FetcherConfig,
}

impl Fetcher {
    pub fn new(client: Client, policy: FetcherConfig) -> Self {
        Self { client, policy }
    }

    /// Builds a fetcher with its own client from the configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self::new(build_http_client(config)?, config.fetcher.clone()))
    }

    /// Fetches a page, retrying transient failures
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// A [`FetchOutcome`]; this function never fails or panics
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let attempts = self.policy.retry_times.max(1);
        let mut last_error = String::from("no attempt made");

        for attempt in 0..attempts {
            tokio::time::sleep(self.request_delay()).await;

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = e.to_string();
                    match classify(&e) {
                        Failure::Fatal => {
                            tracing::error!("Unexpected error fetching {}: {}", url, e);
                            return FetchOutcome::Failed { error: last_error };
                        }
                        Failure::Transient => {
                            tracing::error!(
                                "Request failed (attempt {}/{}): {}: {}",
                                attempt + 1,
                                attempts,
                                url,
                                e
                            );
                            if attempt + 1 == attempts {
                                break;
                            }
                            tokio::time::sleep(self.policy.transport_backoff()).await;
                            continue;
                        }
                    }
                }
            };

            if response.status() == StatusCode::SERVICE_UNAVAILABLE {
                let wait = self.policy.unavailable_backoff(attempt);
                tracing::warn!(
                    "HTTP 503 from {}, waiting {:?} before retrying (attempt {}/{})",
                    url,
                    wait,
                    attempt + 1,
                    attempts
                );
                last_error = "HTTP 503 Service Unavailable".to_string();
                tokio::time::sleep(wait).await;
                continue;
            }

            let body = match response.error_for_status() {
                Ok(response) => response.text().await,
                Err(e) => Err(e),
            };

            match body {
                Ok(body) => {
                    tracing::debug!(
                        "Fetched {} ({} bytes, attempt {})",
                        url,
                        body.len(),
                        attempt + 1
                    );
                    return FetchOutcome::Success {
                        body,
                        attempts: attempt + 1,
                    };
                }
                Err(e) => {
                    last_error = e.to_string();
                    if classify(&e) == Failure::Fatal {
                        tracing::error!("Unexpected error reading {}: {}", url, e);
                        return FetchOutcome::Failed { error: last_error };
                    }
                    tracing::error!(
                        "Request failed (attempt {}/{}): {}: {}",
                        attempt + 1,
                        attempts,
                        url,
                        e
                    );
                    if attempt + 1 == attempts {
                        break;
                    }
                    tokio::time::sleep(self.policy.transport_backoff()).await;
                }
            }
        }

        tracing::warn!("Giving up on {} after {} attempts: {}", url, attempts, last_error);
        FetchOutcome::Exhausted {
            attempts,
            last_error,
        }
    }

    /// Fetches a page once, with no pacing and no retry
    ///
    /// Used for one-shot, low-volume requests such as searches and book
    /// pages. Non-2xx statuses are errors.
    pub async fn fetch_once(&self, url: &str) -> Result<String, HarvestError> {
        tracing::debug!("Fetching once: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| HarvestError::from_request(url, e))?;

        response
            .text()
            .await
            .map_err(|e| HarvestError::from_request(url, e))
    }

    /// Random pause taken before every attempt
    fn request_delay(&self) -> Duration {
        let min = self.policy.min_delay_ms;
        let max = self.policy.max_delay_ms.max(min);
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Sorts a reqwest error into retryable and fatal failures
fn classify(error: &reqwest::Error) -> Failure {
    if error.is_timeout()
        || error.is_connect()
        || error.is_request()
        || error.is_body()
        || error.is_status()
    {
        Failure::Transient
    } else {
        Failure::Fatal
    }
}
