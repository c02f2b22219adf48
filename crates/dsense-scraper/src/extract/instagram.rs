//! Hashtag post-count extraction from Instagram tag pages.
//!
//! Three shapes, tried in order: the `window._sharedData` JSON blob,
//! the `og:description` meta tag, and a post-count phrase anywhere in
//! the page text. Instagram reports a total post count only; it maps to
//! the `videos` field of the measurement, with views and likes left
//! unset.

use regex::Regex;
use serde_json::Value;

use dsense_core::HashtagMeasurement;

use super::first_success;

/// Extracts hashtag metrics from an Instagram tag page, or `None` when
/// no strategy matches.
#[must_use]
pub fn extract_hashtag_stats(html: &str) -> Option<HashtagMeasurement> {
    first_success(html, &[from_shared_data, from_meta_description, from_page_text])
}

fn post_count_measurement(count: i64) -> HashtagMeasurement {
    HashtagMeasurement {
        views: None,
        videos: Some(count),
        likes: None,
    }
}

/// Strategy 1: parse the `window._sharedData` blob and walk
/// `entry_data → TagPage[0] → graphql → hashtag → edge_hashtag_to_media → count`.
fn from_shared_data(html: &str) -> Option<HashtagMeasurement> {
    let script_re = Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.+?\});</script>")
        .expect("valid sharedData regex");

    let raw = script_re.captures(html)?.get(1)?.as_str();
    let data: Value = serde_json::from_str(raw).ok()?;

    let count = data
        .pointer("/entry_data/TagPage/0/graphql/hashtag/edge_hashtag_to_media/count")?
        .as_i64()?;

    Some(post_count_measurement(count))
}

/// Strategy 2: post count from the `og:description` meta tag content.
fn from_meta_description(html: &str) -> Option<HashtagMeasurement> {
    let meta_re = Regex::new(
        r#"(?is)<meta[^>]*property\s*=\s*["']og:description["'][^>]*content\s*=\s*["']([^"']*)["']"#,
    )
    .expect("valid og:description regex");

    let content = meta_re.captures(html)?.get(1)?.as_str();
    let count = find_post_count(content)?;
    Some(post_count_measurement(count))
}

/// Strategy 3: post-count phrase anywhere in the raw page content.
fn from_page_text(html: &str) -> Option<HashtagMeasurement> {
    let count = find_post_count(html)?;
    Some(post_count_measurement(count))
}

/// Matches `"1,234,567 posts"` and parses the digit-grouped count.
///
/// Instagram groups digits with commas rather than using magnitude
/// suffixes, so this stays local instead of going through
/// [`crate::numeric::parse_count`].
fn find_post_count(text: &str) -> Option<i64> {
    let posts_re = Regex::new(r"(?i)([\d,]+)\s+posts?").expect("valid posts regex");
    let raw = posts_re.captures(text)?.get(1)?.as_str();
    raw.replace(',', "").parse::<i64>().ok()
}
