use dsense_core::watchlist::WatchlistFile;
use sqlx::SqlitePool;
use tracing::info;

use crate::DbError;

/// Counts of dimension rows registered by a seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub hashtags: usize,
    pub products: usize,
}

/// Registers the watchlist's hashtags and products as dimension rows.
///
/// Existing rows are left untouched (`ON CONFLICT DO NOTHING`), so
/// re-seeding after a watchlist edit only adds the new entries.
/// Platforms are not seeded here; the closed platform set ships with the
/// schema migration. All inserts run inside a single transaction; if any
/// statement fails the entire batch is rolled back.
///
/// Returns the number of rows actually inserted per dimension.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_watchlist(
    pool: &SqlitePool,
    watchlist: &WatchlistFile,
) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for hashtag in &watchlist.hashtags {
        let inserted = sqlx::query(
            "INSERT INTO hashtags (tag, category) VALUES (?, ?) \
             ON CONFLICT(tag) DO NOTHING",
        )
        .bind(&hashtag.tag)
        .bind(&hashtag.category)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        summary.hashtags += usize::try_from(inserted).unwrap_or(0);
    }

    for product in &watchlist.products {
        let inserted = sqlx::query(
            "INSERT INTO products (keyword, category, market) VALUES (?, ?, ?) \
             ON CONFLICT(keyword) DO NOTHING",
        )
        .bind(&product.keyword)
        .bind(&product.category)
        .bind(&product.market)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        summary.products += usize::try_from(inserted).unwrap_or(0);
    }

    tx.commit().await?;

    info!(
        hashtags = summary.hashtags,
        products = summary.products,
        "watchlist seeded"
    );
    Ok(summary)
}
