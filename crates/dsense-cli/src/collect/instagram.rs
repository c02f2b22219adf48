use chrono::NaiveDate;
use sqlx::SqlitePool;

use dsense_core::watchlist::Platform;
use dsense_core::{AppConfig, WatchlistFile};
use dsense_scraper::extract::instagram::extract_hashtag_stats;
use dsense_scraper::PageClient;

use super::social::{collect_social, SocialSource};
use super::SourceSummary;

// Instagram rate limits harder than TikTok; double the inter-request delay.
const SOURCE: SocialSource = SocialSource {
    platform: Platform::Instagram,
    accept_language: "en-US,en;q=0.5",
    delay_multiplier: 2,
    page_url: tag_url,
    extract: extract_hashtag_stats,
};

fn tag_url(tag: &str) -> String {
    format!("https://www.instagram.com/explore/tags/{tag}/")
}

pub(crate) async fn collect(
    pool: &SqlitePool,
    client: &PageClient,
    config: &AppConfig,
    watchlist: &WatchlistFile,
    today: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<SourceSummary> {
    collect_social(pool, client, config, watchlist, &SOURCE, today, dry_run).await
}
