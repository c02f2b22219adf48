//! Lookups and registration for the dimension tables.
//!
//! `resolve_*` are pure lookups: they never create rows. Registration of
//! hashtags and products on first reference is a deliberate caller
//! decision and goes through `ensure_*`; platforms have no ensure path
//! at all because the set is closed and seeded by migration.

use sqlx::SqlitePool;

use crate::DbError;

/// Returns the platform id for a platform name, or `None` if unseeded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn resolve_platform(pool: &SqlitePool, name: &str) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>("SELECT platform_id FROM platforms WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Returns the hashtag id for a tag, or `None` if not registered.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn resolve_hashtag(pool: &SqlitePool, tag: &str) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>("SELECT hashtag_id FROM hashtags WHERE tag = ?")
        .bind(tag)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Returns the product id for a search keyword, or `None` if not registered.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn resolve_product(pool: &SqlitePool, keyword: &str) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>("SELECT product_id FROM products WHERE keyword = ?")
        .bind(keyword)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Registers a hashtag if absent and returns its id either way.
///
/// The insert-then-select round trip is a single statement with
/// `ON CONFLICT DO NOTHING` plus `RETURNING`; on conflict SQLite returns
/// no row, so a follow-up lookup covers the already-registered case.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn ensure_hashtag(pool: &SqlitePool, tag: &str, category: &str) -> Result<i64, DbError> {
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO hashtags (tag, category) VALUES (?, ?) \
         ON CONFLICT(tag) DO NOTHING \
         RETURNING hashtag_id",
    )
    .bind(tag)
    .bind(category)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    resolve_hashtag(pool, tag)
        .await?
        .ok_or_else(|| DbError::UnknownHashtag(tag.to_string()))
}

/// Registers a product keyword if absent and returns its id either way.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn ensure_product(
    pool: &SqlitePool,
    keyword: &str,
    category: &str,
    market: &str,
) -> Result<i64, DbError> {
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (keyword, category, market) VALUES (?, ?, ?) \
         ON CONFLICT(keyword) DO NOTHING \
         RETURNING product_id",
    )
    .bind(keyword)
    .bind(category)
    .bind(market)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = inserted {
        return Ok(id);
    }

    resolve_product(pool, keyword)
        .await?
        .ok_or_else(|| DbError::UnknownProduct(keyword.to_string()))
}
