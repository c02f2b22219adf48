//! HTTP page fetcher for the collectors.
//!
//! The extraction pipeline itself never touches the network; collectors
//! fetch raw page text through this client and hand it to the
//! extractors. Rate limiting between requests belongs to the caller;
//! this client only handles per-request concerns (timeout, headers,
//! typed status errors, retry on transient failures).

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Fetches raw page content with typed status handling.
///
/// HTTP 429 and network-level failures are retried with exponential
/// backoff up to `max_retries` additional attempts; 404 and other non-2xx
/// statuses are returned immediately as typed errors.
pub struct PageClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl PageClient {
    /// Creates a `PageClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first failure for
    /// retriable errors (429, network errors). Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page and returns its body text, with automatic retry
    /// on transient errors.
    ///
    /// `accept_language` lets marketplace collectors request the source
    /// locale (`pl-PL`) while the social collectors stay with English
    /// pages.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ScraperError::Http`] — network or TLS failure after all retries exhausted.
    pub async fn fetch_page(
        &self,
        url: &str,
        accept_language: &str,
    ) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            let accept_language = accept_language.to_owned();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, &accept_language)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);

                    return Err(ScraperError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                debug!(url, bytes = body.len(), "page fetched");
                Ok(body)
            }
        })
        .await
    }
}

/// Best-effort host extraction for error labels, no URL crate required.
fn extract_domain(url: &str) -> String {
    url.split("//")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_domain_from_full_url() {
        assert_eq!(
            extract_domain("https://allegro.pl/listing?string=desk+mat"),
            "allegro.pl"
        );
    }

    #[test]
    fn extract_domain_without_scheme() {
        assert_eq!(extract_domain("allegro.pl/listing"), "allegro.pl");
    }
}
