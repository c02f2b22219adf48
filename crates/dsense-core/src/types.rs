//! Measurement records produced by the extractors and written by the store.

use serde::{Deserialize, Serialize};

/// One day's engagement reading for a hashtag on a social platform.
///
/// All fields are optional: a page variant may expose views without
/// likes, or only a post count. An extractor that finds nothing at all
/// returns no measurement rather than an all-`None` record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagMeasurement {
    pub views: Option<i64>,
    /// Video/post count. Instagram's post count maps here.
    pub videos: Option<i64>,
    pub likes: Option<i64>,
}

impl HashtagMeasurement {
    /// True when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_none() && self.videos.is_none() && self.likes.is_none()
    }
}

/// One day's marketplace reading for a product keyword, aggregated over
/// a bounded sample of search-result listings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceMeasurement {
    /// Arithmetic mean of the prices that parsed; `None` when no sampled
    /// listing yielded a price. Unrounded; callers round on persistence.
    pub avg_price: Option<f64>,
    /// Number of listing fragments sampled. Reflects sample size, not
    /// extraction success: a fragment with no parseable price still counts.
    pub offer_count: i64,
    /// Sum of "bought by N people" disclosures across the sample; `None`
    /// when no listing carried one.
    pub sales_proxy: Option<i64>,
}
