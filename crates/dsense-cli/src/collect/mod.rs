//! Collection drivers: fetch raw pages, run the extractors, write
//! through the store.
//!
//! One driver per source. A source that fails outright (storage fault,
//! client construction) is recorded and the remaining sources still
//! run; per-entity problems (fetch errors, empty extractions, unknown
//! dimensions) are logged and skipped so one bad hashtag never sinks a
//! run. Skipped entities leave any prior day's row for their key
//! untouched.

pub(crate) mod allegro;
pub(crate) mod instagram;
pub(crate) mod social;
pub(crate) mod tiktok;

use sqlx::SqlitePool;
use tracing::{error, info};

use dsense_core::{AppConfig, WatchlistFile};
use dsense_scraper::PageClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum SourceArg {
    All,
    Tiktok,
    Instagram,
    Allegro,
}

impl SourceArg {
    fn includes(self, other: SourceArg) -> bool {
        self == SourceArg::All || self == other
    }
}

/// Per-source tally: entities attempted vs. entities measured and written.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SourceSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

/// Runs the selected collection sources in sequence.
///
/// Returns an error only when every selected source failed outright;
/// partial success is a successful run, mirroring the store's
/// skip-on-failure semantics.
pub(crate) async fn run(
    pool: &SqlitePool,
    config: &AppConfig,
    watchlist: &WatchlistFile,
    source: SourceArg,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = PageClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_secs,
    )?;
    let today = chrono::Utc::now().date_naive();

    let mut outcomes: Vec<(&'static str, anyhow::Result<SourceSummary>)> = Vec::new();

    if source.includes(SourceArg::Tiktok) {
        info!("starting TikTok collection");
        let outcome = tiktok::collect(pool, &client, config, watchlist, today, dry_run).await;
        outcomes.push(("tiktok", outcome));
    }
    if source.includes(SourceArg::Instagram) {
        info!("starting Instagram collection");
        let outcome = instagram::collect(pool, &client, config, watchlist, today, dry_run).await;
        outcomes.push(("instagram", outcome));
    }
    if source.includes(SourceArg::Allegro) {
        info!("starting Allegro collection");
        let outcome = allegro::collect(pool, &client, config, watchlist, today, dry_run).await;
        outcomes.push(("allegro", outcome));
    }

    let mut any_ok = false;
    for (name, outcome) in &outcomes {
        match outcome {
            Ok(summary) => {
                any_ok = true;
                info!(
                    source = name,
                    attempted = summary.attempted,
                    succeeded = summary.succeeded,
                    "source complete"
                );
            }
            Err(err) => error!(source = name, error = %err, "source failed"),
        }
    }

    if !any_ok {
        anyhow::bail!("all collection sources failed");
    }
    Ok(())
}
