//! Hashtag engagement extraction from TikTok tag pages.
//!
//! Preferred shape: the server-rendered rehydration blob in the
//! `__UNIVERSAL_DATA_FOR_REHYDRATION__` script tag, which carries exact
//! counts. When it is absent (or fails to parse), magnitude-suffixed
//! counts from the visible page text are the fallback.

use regex::Regex;
use serde_json::Value;

use dsense_core::HashtagMeasurement;

use super::first_success;
use crate::numeric::parse_count;

/// Extracts hashtag metrics from a TikTok tag page, or `None` when no
/// strategy matches.
///
/// Likes are not exposed at hashtag level on either page shape and stay
/// `None`.
#[must_use]
pub fn extract_hashtag_stats(html: &str) -> Option<HashtagMeasurement> {
    first_success(html, &[from_rehydration_data, from_page_text])
}

/// Strategy 1: parse the embedded rehydration JSON and walk
/// `__DEFAULT_SCOPE__ → webapp.challenge-detail → challengeInfo → stats`.
///
/// Yields nothing if the script tag is absent, the blob does not parse,
/// or the path is missing any segment — the fallback runs instead.
fn from_rehydration_data(html: &str) -> Option<HashtagMeasurement> {
    let script_re = Regex::new(
        r#"(?is)<script[^>]*id\s*=\s*["']__UNIVERSAL_DATA_FOR_REHYDRATION__["'][^>]*>(.*?)</script>"#,
    )
    .expect("valid rehydration script regex");

    let raw = script_re.captures(html)?.get(1)?.as_str().trim();
    let data: Value = serde_json::from_str(raw).ok()?;

    let stats = data
        .pointer("/__DEFAULT_SCOPE__/webapp.challenge-detail/challengeInfo/stats")?;

    let views = stats.get("viewCount").and_then(Value::as_i64);
    let videos = stats.get("videoCount").and_then(Value::as_i64);

    // A stats node with neither count is a broken path, not a zero reading.
    if views.is_none() && videos.is_none() {
        return None;
    }

    Some(HashtagMeasurement {
        views,
        videos,
        likes: None,
    })
}

/// Strategy 2: magnitude counts from the visible page text, e.g.
/// `"1.2M views"` / `"45.3K videos"`.
fn from_page_text(html: &str) -> Option<HashtagMeasurement> {
    let views_re =
        Regex::new(r"(?i)(\d+\.?\d*[KMB]?)\s+views?").expect("valid views regex");
    let videos_re =
        Regex::new(r"(?i)(\d+\.?\d*[KMB]?)\s+videos?").expect("valid videos regex");

    let views = views_re
        .captures(html)
        .and_then(|c| parse_count(c.get(1)?.as_str()));
    let videos = videos_re
        .captures(html)
        .and_then(|c| parse_count(c.get(1)?.as_str()));

    if views.is_none() && videos.is_none() {
        return None;
    }

    Some(HashtagMeasurement {
        views,
        videos,
        likes: None,
    })
}
