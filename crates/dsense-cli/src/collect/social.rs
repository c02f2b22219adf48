//! Shared driver for the social hashtag sources.
//!
//! TikTok and Instagram differ only in URL shape, extractor, and how
//! cautious the inter-request delay needs to be; everything else — the
//! fetch/extract/upsert loop with per-tag failure isolation — is
//! identical and lives here.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{info, warn};

use dsense_core::watchlist::Platform;
use dsense_core::{AppConfig, HashtagMeasurement, WatchlistFile};
use dsense_scraper::PageClient;

use super::SourceSummary;

/// A social source's collection profile.
pub(crate) struct SocialSource {
    pub platform: Platform,
    pub accept_language: &'static str,
    /// Multiplier on the configured inter-request delay. Sources with
    /// aggressive rate limiting get a larger one.
    pub delay_multiplier: u64,
    pub page_url: fn(&str) -> String,
    pub extract: fn(&str) -> Option<HashtagMeasurement>,
}

/// Collects every watchlist tag for one social source.
///
/// Per-tag fetch and extraction failures are logged and skipped;
/// unknown-dimension rejections likewise. Only a storage fault aborts
/// the source.
pub(crate) async fn collect_social(
    pool: &SqlitePool,
    client: &PageClient,
    config: &AppConfig,
    watchlist: &WatchlistFile,
    source: &SocialSource,
    today: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<SourceSummary> {
    let tags = watchlist.tags_for(source.platform);
    let mut summary = SourceSummary {
        attempted: tags.len(),
        succeeded: 0,
    };
    let delay =
        Duration::from_millis(config.scraper_rate_limit_delay_ms * source.delay_multiplier);

    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }

        let url = (source.page_url)(tag);
        let html = match client.fetch_page(&url, source.accept_language).await {
            Ok(html) => html,
            Err(err) => {
                warn!(platform = %source.platform, tag, error = %err, "fetch failed");
                continue;
            }
        };

        let Some(measurement) = (source.extract)(&html) else {
            warn!(platform = %source.platform, tag, "could not extract hashtag data");
            continue;
        };

        info!(
            platform = %source.platform,
            tag,
            views = ?measurement.views,
            videos = ?measurement.videos,
            "hashtag measured"
        );

        if !dry_run {
            let result = dsense_db::upsert_social_metric(
                pool,
                today,
                source.platform.as_str(),
                tag,
                measurement.views,
                measurement.videos,
                measurement.likes,
            )
            .await;

            match result {
                Ok(()) => {}
                Err(err) if err.is_unresolved_dimension() => {
                    warn!(platform = %source.platform, tag, error = %err, "write rejected");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        summary.succeeded += 1;
    }

    Ok(summary)
}
