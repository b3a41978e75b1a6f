//! Integration tests for cwm-harvest
//!
//! These tests use wiremock to stand in for the site and exercise the
//! fetcher retry policy and every harvester operation end-to-end.

mod fetcher_tests;
mod harvest_tests;

use cwm_harvest::config::{Config, FetcherConfig, GovernorConfig};

/// Creates a configuration pointed at a mock server with millisecond timings
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.fetcher = FetcherConfig {
        retry_times: 3,
        timeout_secs: 5,
        min_delay_ms: 0,
        max_delay_ms: 2,
        transport_backoff_ms: 1,
        unavailable_backoff_ms: 1,
    };
    config.governor = GovernorConfig {
        max_at_once: 5,
        max_per_second: 1000,
    };
    config
}

/// A chapter page whose header carries the given raw values
pub fn chapter_page(comments: &str, updated_at: &str, words: &str) -> String {
    format!(
        r#"<html><body>
        <div class="read-hd">
            <h1 class="chapter">章节</h1>
            <p>
                <span>更新时间：{updated_at}</span>
                <span>字数：{words}</span>
                <span>间贴：<span id="J_TsukkomiNum">{comments}</span></span>
            </p>
        </div>
        </body></html>"#
    )
}

/// A chapter index listing the given chapter ids, in the given order
pub fn chapter_index_page(base_url: &str, ids: impl IntoIterator<Item = u64>) -> String {
    let items: String = ids
        .into_iter()
        .map(|id| format!(r#"<li><a href="{base_url}/chapter/{id}">第{id}章</a></li>"#))
        .collect();
    format!(r#"<html><body><ul class="book-chapter-list">{items}</ul></body></html>"#)
}
