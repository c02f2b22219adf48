//! Upsert and range retrieval for the `social_metrics` fact table.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::DbError;

/// A social metric row joined with its human-readable dimension names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialMetricRow {
    pub date: NaiveDate,
    pub platform: String,
    pub hashtag: String,
    pub views: Option<i64>,
    pub videos: Option<i64>,
    pub likes: Option<i64>,
}

/// Upserts one day's engagement metrics for `(date, platform, hashtag)`.
///
/// Both dimension names are resolved first; a miss rejects the write
/// without touching any row. On conflict with an existing row for the
/// same composite key, all three measured fields are overwritten and
/// `scraped_at` is refreshed — a full overwrite, never a field merge.
/// Resolution and write share one transaction, committed at the end and
/// rolled back wholesale on any failure.
///
/// # Errors
///
/// Returns [`DbError::UnknownPlatform`] or [`DbError::UnknownHashtag`] if
/// a dimension does not resolve, or [`DbError::Sqlx`] on a storage fault.
pub async fn upsert_social_metric(
    pool: &SqlitePool,
    date: NaiveDate,
    platform_name: &str,
    hashtag: &str,
    views: Option<i64>,
    videos: Option<i64>,
    likes: Option<i64>,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let platform_id: Option<i64> =
        sqlx::query_scalar("SELECT platform_id FROM platforms WHERE name = ?")
            .bind(platform_name)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(platform_id) = platform_id else {
        return Err(DbError::UnknownPlatform(platform_name.to_string()));
    };

    let hashtag_id: Option<i64> = sqlx::query_scalar("SELECT hashtag_id FROM hashtags WHERE tag = ?")
        .bind(hashtag)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(hashtag_id) = hashtag_id else {
        return Err(DbError::UnknownHashtag(hashtag.to_string()));
    };

    sqlx::query(
        "INSERT INTO social_metrics \
             (date, platform_id, hashtag_id, views, videos, likes) \
         VALUES (?, ?, ?, ?, ?, ?) \
         ON CONFLICT(date, platform_id, hashtag_id) DO UPDATE SET \
             views      = excluded.views, \
             videos     = excluded.videos, \
             likes      = excluded.likes, \
             scraped_at = CURRENT_TIMESTAMP",
    )
    .bind(date)
    .bind(platform_id)
    .bind(hashtag_id)
    .bind(views)
    .bind(videos)
    .bind(likes)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(platform = platform_name, hashtag, %date, "social metric upserted");
    Ok(())
}

/// Returns social metric rows with dates in the inclusive range,
/// optionally filtered to one platform.
///
/// Ordered by date descending, then platform name and hashtag ascending.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_social_metrics(
    pool: &SqlitePool,
    start_date: NaiveDate,
    end_date: NaiveDate,
    platform_name: Option<&str>,
) -> Result<Vec<SocialMetricRow>, DbError> {
    const BASE: &str = "SELECT sm.date, p.name AS platform, h.tag AS hashtag, \
                sm.views, sm.videos, sm.likes \
         FROM social_metrics sm \
         JOIN platforms p ON sm.platform_id = p.platform_id \
         JOIN hashtags h ON sm.hashtag_id = h.hashtag_id \
         WHERE sm.date BETWEEN ? AND ?";
    const ORDER: &str = " ORDER BY sm.date DESC, p.name ASC, h.tag ASC";

    let rows = match platform_name {
        Some(name) => {
            let sql = format!("{BASE} AND p.name = ?{ORDER}");
            sqlx::query_as::<_, SocialMetricRow>(&sql)
                .bind(start_date)
                .bind(end_date)
                .bind(name)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{BASE}{ORDER}");
            sqlx::query_as::<_, SocialMetricRow>(&sql)
                .bind(start_date)
                .bind(end_date)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows)
}
