use thiserror::Error;

/// Failures surfaced past the scraper boundary.
///
/// Extraction misses (no matching shape, unparseable numbers) are never
/// errors; they resolve to `None` inside the extractors so fallback
/// strategies can run. These variants cover the fetch collaborator and
/// the one hard extraction failure the marketplace pipeline defines.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The marketplace result page contained zero listing fragments.
    /// Distinct from a successful measurement with zero parsed prices:
    /// this aborts the collection attempt for the keyword.
    #[error("no listings found for keyword \"{keyword}\"")]
    NoListings { keyword: String },
}
