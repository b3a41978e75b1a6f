//! Retry policy of the page fetcher against a mock server

use crate::create_test_config;
use cwm_harvest::{FetchOutcome, Fetcher};
use wiremock::matchers::{header, method, path};
use std::time::{Duration, Instant};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_always_unavailable_is_attempted_exactly_retry_times() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapter/1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let outcome = fetcher.fetch(&format!("{}/chapter/1", mock_server.uri())).await;

    assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 3, .. }));
}

#[tokio::test]
async fn test_success_after_one_unavailable() {
    let mock_server = MockServer::start().await;

    // First request gets a 503, later ones fall through to the 200 mock
    Mock::given(method("GET"))
        .and(path("/chapter/2"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/chapter/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>second</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let outcome = fetcher.fetch(&format!("{}/chapter/2", mock_server.uri())).await;

    match outcome {
        FetchOutcome::Success { body, attempts } => {
            assert_eq!(body, "<html>second</html>");
            assert_eq!(attempts, 2);
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_status_is_retried_then_given_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapter/3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let outcome = fetcher.fetch(&format!("{}/chapter/3", mock_server.uri())).await;

    assert!(!outcome.is_success());
    assert!(outcome.into_body().is_none());
}

#[tokio::test]
async fn test_single_attempt_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher.retry_times = 1;

    let fetcher = Fetcher::from_config(&config).unwrap();
    let outcome = fetcher.fetch(&format!("{}/chapter/4", mock_server.uri())).await;

    assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 1, .. }));
}

#[tokio::test]
async fn test_browser_headers_are_sent() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri());
    config.headers.user_agent = "cwm-harvest-test/1.0".to_string();

    Mock::given(method("GET"))
        .and(header("user-agent", config.headers.user_agent.as_str()))
        .and(header("referer", config.headers.referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&config).unwrap();
    let body = fetcher
        .fetch(&format!("{}/book/1", mock_server.uri()))
        .await
        .into_body();

    assert_eq!(body.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_fetch_once_does_not_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = Fetcher::from_config(&create_test_config(&mock_server.uri())).unwrap();
    let result = fetcher
        .fetch_once(&format!("{}/book/1", mock_server.uri()))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_unexpected_error_fails_without_retry() {
    let mut config = create_test_config("http://127.0.0.1");
    config.fetcher.transport_backoff_ms = 5_000;
    config.fetcher.unavailable_backoff_ms = 5_000;

    let fetcher = Fetcher::from_config(&config).unwrap();
    let started = Instant::now();
    let outcome = fetcher.fetch("not a url").await;

    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    // A retry would have slept through the 5s backoff first
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_slow_response_times_out_and_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapter/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_millis(1_500)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher.timeout_secs = 1;
    config.fetcher.retry_times = 2;

    let fetcher = Fetcher::from_config(&config).unwrap();
    let outcome = fetcher.fetch(&format!("{}/chapter/5", mock_server.uri())).await;

    assert!(matches!(outcome, FetchOutcome::Exhausted { attempts: 2, .. }));
}

#[tokio::test]
async fn test_first_attempt_waits_for_request_delay() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapter/6"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher.min_delay_ms = 300;
    config.fetcher.max_delay_ms = 300;

    let fetcher = Fetcher::from_config(&config).unwrap();
    let started = Instant::now();
    let outcome = fetcher.fetch(&format!("{}/chapter/6", mock_server.uri())).await;

    assert!(matches!(outcome, FetchOutcome::Success { attempts: 1, .. }));
    assert!(started.elapsed() >= Duration::from_millis(300));
}
