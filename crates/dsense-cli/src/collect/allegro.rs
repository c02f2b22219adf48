//! Marketplace collection driver for Allegro keyword searches.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{info, warn};

use dsense_core::{AppConfig, WatchlistFile};
use dsense_scraper::extract::allegro::extract_listing_stats;
use dsense_scraper::{PageClient, ScraperError};

use super::SourceSummary;

const ACCEPT_LANGUAGE: &str = "pl-PL,pl;q=0.9,en;q=0.8";

/// Search URL for a keyword, sorted by popularity.
///
/// Keywords are plain ASCII words from the watchlist; form-encoding the
/// spaces is all the escaping they need.
fn listing_url(keyword: &str) -> String {
    format!(
        "https://allegro.pl/listing?string={}&order=p",
        keyword.replace(' ', "+")
    )
}

pub(crate) async fn collect(
    pool: &SqlitePool,
    client: &PageClient,
    config: &AppConfig,
    watchlist: &WatchlistFile,
    today: NaiveDate,
    dry_run: bool,
) -> anyhow::Result<SourceSummary> {
    let mut summary = SourceSummary {
        attempted: watchlist.products.len(),
        succeeded: 0,
    };
    let delay = Duration::from_millis(config.scraper_rate_limit_delay_ms);

    for (i, product) in watchlist.products.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(delay).await;
        }
        let keyword = product.keyword.as_str();

        let url = listing_url(keyword);
        let html = match client.fetch_page(&url, ACCEPT_LANGUAGE).await {
            Ok(html) => html,
            Err(err) => {
                warn!(keyword, error = %err, "fetch failed");
                continue;
            }
        };

        let measurement =
            match extract_listing_stats(&html, keyword, config.marketplace_sample_size) {
                Ok(measurement) => measurement,
                Err(ScraperError::NoListings { .. }) => {
                    warn!(keyword, "no listings found");
                    continue;
                }
                Err(err) => {
                    warn!(keyword, error = %err, "extraction failed");
                    continue;
                }
            };

        let avg_price = measurement.avg_price.map(round_price);
        info!(
            keyword,
            offers = measurement.offer_count,
            avg_price = ?avg_price,
            sales_proxy = ?measurement.sales_proxy,
            "keyword measured"
        );

        if !dry_run {
            let result = dsense_db::upsert_marketplace_metric(
                pool,
                today,
                keyword,
                avg_price,
                Some(measurement.offer_count),
                measurement.sales_proxy,
            )
            .await;

            match result {
                Ok(()) => {}
                Err(err) if err.is_unresolved_dimension() => {
                    warn!(keyword, error = %err, "write rejected");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        summary.succeeded += 1;
    }

    Ok(summary)
}

/// Rounds an average price to the store's 2-fraction-digit precision.
fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_url_form_encodes_spaces() {
        assert_eq!(
            listing_url("monitor light bar"),
            "https://allegro.pl/listing?string=monitor+light+bar&order=p"
        );
    }

    #[test]
    fn round_price_two_fraction_digits() {
        assert_eq!(round_price(123.456), 123.46);
        assert_eq!(round_price(100.0), 100.0);
        // Mean of 100.00 and 33.33 style repeating fractions.
        assert_eq!(round_price(66.664_999), 66.66);
    }
}
