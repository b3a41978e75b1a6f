//! Records produced by the extractors
//!
//! All records are transient: built once per request, never mutated, and
//! handed to the charting or card-rendering layers. Fields that could not be
//! extracted carry documented sentinel values instead of being absent:
//! - strings default to `""` (or a visible placeholder for search results)
//! - timestamps default to [`UNKNOWN_TIMESTAMP`]
//! - lists default to empty

mod book;
mod chapter;

pub use book::{
    BookDetail, Metric, SearchResultItem, STAT_TOTAL_CLICKS, STAT_TOTAL_FAVORITES, STAT_TOTAL_WORDS,
};
pub use chapter::{ChapterDetail, ChapterRef, ChapterRow};

/// Sentinel for a timestamp that was absent or unparseable
pub const UNKNOWN_TIMESTAMP: i64 = -1;

/// Placeholder title for a search result without one
pub const UNKNOWN_TITLE: &str = "未知标题";

/// Placeholder author for a search result without one
pub const UNKNOWN_AUTHOR: &str = "未知作者";

/// Placeholder update time for a search result without one
pub const UNKNOWN_UPDATE: &str = "未知更新";

/// Placeholder link for a search result whose URL could not be resolved
pub const UNKNOWN_LINK: &str = "未知链接";
