//! Upsert and range retrieval for the `marketplace_metrics` fact table.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::DbError;

/// A marketplace metric row joined with its product keyword.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MarketplaceMetricRow {
    pub date: NaiveDate,
    pub keyword: String,
    pub avg_price: Option<f64>,
    pub offer_count: Option<i64>,
    pub sales_proxy: Option<i64>,
}

/// Upserts one day's marketplace metrics for `(date, product keyword)`.
///
/// The keyword is resolved to a product id first; a miss rejects the
/// write without touching any row. On conflict with an existing row for
/// the same composite key, all measured fields are overwritten and
/// `scraped_at` is refreshed. `avg_price` is stored as passed; callers
/// round to 2 fraction digits before the write.
///
/// # Errors
///
/// Returns [`DbError::UnknownProduct`] if the keyword does not resolve,
/// or [`DbError::Sqlx`] on a storage fault.
pub async fn upsert_marketplace_metric(
    pool: &SqlitePool,
    date: NaiveDate,
    keyword: &str,
    avg_price: Option<f64>,
    offer_count: Option<i64>,
    sales_proxy: Option<i64>,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let product_id: Option<i64> =
        sqlx::query_scalar("SELECT product_id FROM products WHERE keyword = ?")
            .bind(keyword)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(product_id) = product_id else {
        return Err(DbError::UnknownProduct(keyword.to_string()));
    };

    sqlx::query(
        "INSERT INTO marketplace_metrics \
             (date, product_id, avg_price, offer_count, sales_proxy) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(date, product_id) DO UPDATE SET \
             avg_price   = excluded.avg_price, \
             offer_count = excluded.offer_count, \
             sales_proxy = excluded.sales_proxy, \
             scraped_at  = CURRENT_TIMESTAMP",
    )
    .bind(date)
    .bind(product_id)
    .bind(avg_price)
    .bind(offer_count)
    .bind(sales_proxy)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(keyword, %date, "marketplace metric upserted");
    Ok(())
}

/// Returns marketplace metric rows with dates in the inclusive range,
/// optionally filtered to one keyword.
///
/// Ordered by date descending, then keyword ascending.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_marketplace_metrics(
    pool: &SqlitePool,
    start_date: NaiveDate,
    end_date: NaiveDate,
    keyword: Option<&str>,
) -> Result<Vec<MarketplaceMetricRow>, DbError> {
    const BASE: &str = "SELECT mm.date, pr.keyword, mm.avg_price, mm.offer_count, mm.sales_proxy \
         FROM marketplace_metrics mm \
         JOIN products pr ON mm.product_id = pr.product_id \
         WHERE mm.date BETWEEN ? AND ?";
    const ORDER: &str = " ORDER BY mm.date DESC, pr.keyword ASC";

    let rows = match keyword {
        Some(keyword) => {
            let sql = format!("{BASE} AND pr.keyword = ?{ORDER}");
            sqlx::query_as::<_, MarketplaceMetricRow>(&sql)
                .bind(start_date)
                .bind(end_date)
                .bind(keyword)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{BASE}{ORDER}");
            sqlx::query_as::<_, MarketplaceMetricRow>(&sql)
                .bind(start_date)
                .bind(end_date)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows)
}
