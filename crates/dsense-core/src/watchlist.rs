use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Social platforms the system collects hashtag metrics from.
///
/// This is a closed set: the database seeds exactly these platforms (plus
/// the marketplace) and the store rejects writes against anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    TikTok,
    Instagram,
}

impl Platform {
    /// Stable name used as the dimension key in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagConfig {
    /// Tag without the leading `#`.
    pub tag: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// Which platforms to collect this tag from.
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Marketplace search keyword, e.g. "monitor light bar".
    pub keyword: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_market")]
    pub market: String,
}

fn default_category() -> String {
    "desk_setup".to_string()
}

fn default_market() -> String {
    "PL".to_string()
}

#[derive(Debug, Deserialize)]
pub struct WatchlistFile {
    pub hashtags: Vec<HashtagConfig>,
    pub products: Vec<ProductConfig>,
}

impl WatchlistFile {
    /// Tags tracked on the given platform, in file order.
    #[must_use]
    pub fn tags_for(&self, platform: Platform) -> Vec<&str> {
        self.hashtags
            .iter()
            .filter(|h| h.platforms.contains(&platform))
            .map(|h| h.tag.as_str())
            .collect()
    }
}

/// Load and validate the watchlist configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_watchlist(path: &Path) -> Result<WatchlistFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::WatchlistIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let watchlist: WatchlistFile = serde_yaml::from_str(&content)?;

    validate_watchlist(&watchlist)?;

    Ok(watchlist)
}

fn validate_watchlist(watchlist: &WatchlistFile) -> Result<(), ConfigError> {
    let mut seen_tags = HashSet::new();
    let mut seen_keywords = HashSet::new();

    for hashtag in &watchlist.hashtags {
        if hashtag.tag.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hashtag tag must be non-empty".to_string(),
            ));
        }
        if hashtag.tag.starts_with('#') {
            return Err(ConfigError::Validation(format!(
                "hashtag '{}' must be listed without the leading '#'",
                hashtag.tag
            )));
        }
        if hashtag.platforms.is_empty() {
            return Err(ConfigError::Validation(format!(
                "hashtag '{}' lists no platforms",
                hashtag.tag
            )));
        }
        if !seen_tags.insert(hashtag.tag.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate hashtag: '{}'",
                hashtag.tag
            )));
        }
    }

    for product in &watchlist.products {
        if product.keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product keyword must be non-empty".to_string(),
            ));
        }
        if !seen_keywords.insert(product.keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product keyword: '{}'",
                product.keyword
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
hashtags:
  - tag: desksetup
    platforms: [TikTok, Instagram]
  - tag: homeoffice
    category: desk_setup
    platforms: [TikTok]
products:
  - keyword: monitor light bar
  - keyword: desk mat
    market: PL
"#
    }

    #[test]
    fn parse_sample_watchlist() {
        let watchlist: WatchlistFile = serde_yaml::from_str(sample_yaml()).unwrap();
        validate_watchlist(&watchlist).unwrap();

        assert_eq!(watchlist.hashtags.len(), 2);
        assert_eq!(watchlist.products.len(), 2);
        assert_eq!(watchlist.hashtags[0].category, "desk_setup");
        assert_eq!(watchlist.products[1].market, "PL");
    }

    #[test]
    fn tags_for_filters_by_platform() {
        let watchlist: WatchlistFile = serde_yaml::from_str(sample_yaml()).unwrap();

        assert_eq!(
            watchlist.tags_for(Platform::TikTok),
            vec!["desksetup", "homeoffice"]
        );
        assert_eq!(watchlist.tags_for(Platform::Instagram), vec!["desksetup"]);
    }

    #[test]
    fn duplicate_tags_rejected() {
        let yaml = r#"
hashtags:
  - tag: desksetup
    platforms: [TikTok]
  - tag: DeskSetup
    platforms: [Instagram]
products: []
"#;
        let watchlist: WatchlistFile = serde_yaml::from_str(yaml).unwrap();
        let result = validate_watchlist(&watchlist);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn leading_hash_rejected() {
        let yaml = r##"
hashtags:
  - tag: "#desksetup"
    platforms: [TikTok]
products: []
"##;
        let watchlist: WatchlistFile = serde_yaml::from_str(yaml).unwrap();
        let result = validate_watchlist(&watchlist);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_platform_list_rejected() {
        let yaml = r#"
hashtags:
  - tag: desksetup
    platforms: []
products: []
"#;
        let watchlist: WatchlistFile = serde_yaml::from_str(yaml).unwrap();
        let result = validate_watchlist(&watchlist);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn duplicate_keywords_rejected() {
        let yaml = r#"
hashtags: []
products:
  - keyword: desk mat
  - keyword: Desk Mat
"#;
        let watchlist: WatchlistFile = serde_yaml::from_str(yaml).unwrap();
        let result = validate_watchlist(&watchlist);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
