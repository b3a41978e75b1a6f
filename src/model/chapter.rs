use serde::Serialize;

/// A chapter as listed on the chapter-index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterRef {
    /// Site-assigned chapter id, also used as the recency order
    pub id: u64,

    /// Chapter title as shown in the index
    pub title: String,
}

impl ChapterRef {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Row shape consumed by the charting layer:
/// `(id, title, comment_count, updated_at, word_count)`
pub type ChapterRow = (u64, String, u64, String, u64);

/// Per-chapter statistics scraped from a chapter page
///
/// Only built when the comment count, update time and word count were all
/// present; a page missing any of them yields no record at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterDetail {
    pub id: u64,
    pub title: String,

    /// Number of inline reader comments ("间贴数")
    pub comment_count: u64,

    /// Update time exactly as displayed, `YYYY-MM-DD HH:MM:SS` in UTC+8
    pub updated_at: String,

    pub word_count: u64,
}

impl ChapterDetail {
    pub fn as_row(&self) -> ChapterRow {
        (
            self.id,
            self.title.clone(),
            self.comment_count,
            self.updated_at.clone(),
            self.word_count,
        )
    }
}
