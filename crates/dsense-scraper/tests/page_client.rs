//! Integration tests for `PageClient::fetch_page`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use wiremock::matchers::{headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dsense_scraper::{PageClient, ScraperError};

/// Builds a `PageClient` suitable for tests: 5-second timeout, descriptive UA, no retries.
fn test_client() -> PageClient {
    PageClient::new(5, "dsense-test/0.1", 0, 0).expect("failed to build test PageClient")
}

/// Builds a `PageClient` with retries enabled for retry-specific tests.
fn test_client_with_retries(max_retries: u32) -> PageClient {
    PageClient::new(5, "dsense-test/0.1", max_retries, 0)
        .expect("failed to build test PageClient")
}

#[tokio::test]
async fn fetch_page_returns_body_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tag/desksetup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>1.2M views</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_page(&format!("{}/tag/desksetup", server.uri()), "en-US,en;q=0.5")
        .await
        .unwrap();

    assert_eq!(body, "<html>1.2M views</html>");
}

#[tokio::test]
async fn fetch_page_sends_accept_language() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        // The matcher splits the received value on commas, so the
        // expectation is spelled as the split list.
        .and(headers(
            "accept-language",
            vec!["pl-PL", "pl;q=0.9", "en;q=0.8"],
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_page(
            &format!("{}/listing", server.uri()),
            "pl-PL,pl;q=0.9,en;q=0.8",
        )
        .await
        .unwrap();

    assert_eq!(body, "ok");
}

#[tokio::test]
async fn fetch_page_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tag/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_page(&format!("{}/tag/missing", server.uri()), "en-US")
        .await;

    assert!(matches!(result, Err(ScraperError::NotFound { .. })));
}

#[tokio::test]
async fn fetch_page_maps_other_statuses_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tag/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_page(&format!("{}/tag/blocked", server.uri()), "en-US")
        .await;

    assert!(matches!(
        result,
        Err(ScraperError::UnexpectedStatus { status: 403, .. })
    ));
}

#[tokio::test]
async fn fetch_page_retries_429_then_succeeds() {
    let server = MockServer::start().await;

    // First response is a 429; wiremock serves mocks in mount order once
    // their expected match count is exhausted.
    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let body = test_client_with_retries(2)
        .fetch_page(&format!("{}/listing", server.uri()), "pl-PL")
        .await
        .unwrap();

    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn fetch_page_surfaces_rate_limit_when_retries_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/listing"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .mount(&server)
        .await;

    let result = test_client()
        .fetch_page(&format!("{}/listing", server.uri()), "pl-PL")
        .await;

    assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
}
