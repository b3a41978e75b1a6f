//! Plain-text summary generation
//!
//! Human-readable renderings of harvested records for terminal output.

use crate::extract::format_timestamp;
use crate::model::{
    BookDetail, ChapterDetail, SearchResultItem, STAT_TOTAL_CLICKS, STAT_TOTAL_FAVORITES,
    STAT_TOTAL_WORDS,
};

/// At most this many tags are listed for a book
const MAX_TAGS: usize = 10;

const NO_INTRO: &str = "（无简介）";

/// Formats chapter records as an aligned table, one row per chapter
///
/// Columns are chapter id, comment count, word count, update time and title.
pub fn chapter_table(chapters: &[ChapterDetail]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>10}  {:>8}  {:>8}  {:<19}  {}\n",
        "id", "comments", "words", "updated", "title"
    ));

    for chapter in chapters {
        out.push_str(&format!(
            "{:>10}  {:>8}  {:>8}  {:<19}  {}\n",
            chapter.id, chapter.comment_count, chapter.word_count, chapter.updated_at, chapter.title
        ));
    }

    let comments: u64 = chapters.iter().map(|c| c.comment_count).sum();
    let words: u64 = chapters.iter().map(|c| c.word_count).sum();
    out.push_str(&format!(
        "\n{} chapters, {} comments, {} words\n",
        chapters.len(),
        comments,
        words
    ));
    out
}

/// Formats a book's details as a labelled block
pub fn book_summary(book: &BookDetail) -> String {
    let mut out = String::new();

    out.push_str(&format!("《{}》 {}\n", book.title, book.author));

    if !book.tags.is_empty() {
        let tags: Vec<&str> = book.tags.iter().take(MAX_TAGS).map(String::as_str).collect();
        out.push_str(&format!("标签: {}\n", tags.join(" / ")));
    }

    out.push_str(&format!(
        "最近更新: {} {}\n",
        format_timestamp(book.latest_update_ts),
        book.latest_chapter_title
    ));

    for key in [STAT_TOTAL_CLICKS, STAT_TOTAL_FAVORITES, STAT_TOTAL_WORDS] {
        if let Some(value) = book.stats.get(key) {
            out.push_str(&format!("{}: {}\n", key, value));
        }
    }

    for (key, value) in &book.properties {
        out.push_str(&format!("{}: {}\n", key, value));
    }

    if !book.cover_url.is_empty() {
        out.push_str(&format!("封面: {}\n", book.cover_url));
    }

    out.push('\n');
    out.push_str(if book.intro.is_empty() { NO_INTRO } else { book.intro.as_str() });
    out.push('\n');
    out
}

/// Formats up to `max_items` search results under a query heading
pub fn search_summary(items: &[SearchResultItem], query: &str, max_items: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("搜索: {} ({} 条结果)\n", query, items.len()));

    for (index, item) in items.iter().take(max_items).enumerate() {
        out.push_str(&format!("\n{}. {} - {}\n", index + 1, item.title, item.author));
        out.push_str(&format!("   {}\n", item.update_time));
        let description = if item.description.is_empty() {
            NO_INTRO
        } else {
            item.description.as_str()
        };
        out.push_str(&format!("   {}\n", description));
        out.push_str(&format!("   {}\n", item.read_url));
    }

    if items.len() > max_items {
        out.push_str(&format!("\n... {} more\n", items.len() - max_items));
    }
    out
}
