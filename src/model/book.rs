use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::UNKNOWN_TIMESTAMP;

/// Stats key for the total click count
pub const STAT_TOTAL_CLICKS: &str = "总点击";

/// Stats key for the total favorite count
pub const STAT_TOTAL_FAVORITES: &str = "总收藏";

/// Stats key for the total word count
pub const STAT_TOTAL_WORDS: &str = "总字数";

/// A numeric-looking value scraped from the page
///
/// Values such as `"1.2万"` are normalized to numbers; anything that does not
/// parse is kept verbatim rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Number(f64),
    Text(String),
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Metric::Number(value) => write!(f, "{}", value),
            Metric::Text(text) => f.write_str(text),
        }
    }
}

/// Everything the book page tells us about a book
///
/// Each field is extracted independently; a field the page lacks holds its
/// sentinel (`""`, empty list, empty map or [`UNKNOWN_TIMESTAMP`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetail {
    pub title: String,
    pub author: String,
    pub tags: Vec<String>,
    pub latest_chapter_title: String,

    /// Epoch seconds of the latest update, or [`UNKNOWN_TIMESTAMP`]
    pub latest_update_ts: i64,

    pub intro: String,

    /// Absolute cover image URL, `""` when the page has no image
    pub cover_url: String,

    /// Headline counters keyed by [`STAT_TOTAL_CLICKS`] and friends
    pub stats: BTreeMap<String, Metric>,

    /// Label/value pairs from the property box
    pub properties: BTreeMap<String, Metric>,
}

impl BookDetail {
    pub fn has_known_update(&self) -> bool {
        self.latest_update_ts != UNKNOWN_TIMESTAMP
    }
}

impl Default for BookDetail {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            tags: Vec::new(),
            latest_chapter_title: String::new(),
            latest_update_ts: UNKNOWN_TIMESTAMP,
            intro: String::new(),
            cover_url: String::new(),
            stats: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }
}

/// One entry of a search-results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultItem {
    pub title: String,
    pub author: String,
    pub update_time: String,
    pub description: String,

    /// Absolute URL of the book page, or the unknown-link placeholder
    pub read_url: String,
}
