use scraper::Html;

use super::{select_first, select_within, selector};
use crate::model::ChapterDetail;

const UPDATE_LABEL: &str = "更新时间";
const WORDS_LABEL: &str = "字数";

/// Parses a chapter page into a complete [`ChapterDetail`], or nothing
///
/// The header block `div.read-hd` carries the comment count in
/// `span#J_TsukkomiNum`, and its first paragraph holds spans whose text
/// embeds both label and value, e.g. `更新时间：2024-01-01 12:00:00` and
/// `字数：3120`. Labels are matched by substring.
///
/// A record is produced only when all three values are present and truthy
/// (non-empty comment count and update time, non-zero word count). Anything
/// less is logged and dropped.
pub fn parse_chapter_detail(html: &str, id: u64, title: &str) -> Option<ChapterDetail> {
    let document = Html::parse_document(html);

    let Some(header) = select_first(&document, "div.read-hd") else {
        tracing::error!("Chapter {} ({}): header block div.read-hd not found", id, title);
        return None;
    };

    let Some(comment_span) = select_within(header, "span#J_TsukkomiNum") else {
        tracing::error!("Chapter {} ({}): comment count element not found", id, title);
        return None;
    };
    let comments = comment_span.text().collect::<String>().trim().to_string();

    let mut updated_at: Option<String> = None;
    let mut words: Option<u64> = None;

    if let (Some(paragraph), Some(span_selector)) = (select_within(header, "p"), selector("span"))
    {
        for span in paragraph.select(&span_selector) {
            let text = span.text().collect::<String>();
            if text.contains(UPDATE_LABEL) {
                updated_at = Some(value_after_label(&text, UPDATE_LABEL).to_string());
            }
            if text.contains(WORDS_LABEL) {
                let raw = value_after_label(&text, WORDS_LABEL);
                match raw.replace(',', "").parse::<u64>() {
                    Ok(count) => words = Some(count),
                    Err(e) => {
                        tracing::error!(
                            "Chapter {} ({}): unparseable word count {:?}: {}",
                            id,
                            title,
                            raw,
                            e
                        );
                        return None;
                    }
                }
            }
        }
    }

    let comment_count = comments.replace(',', "").parse::<u64>().ok();

    match (comment_count, updated_at, words) {
        (Some(comment_count), Some(updated_at), Some(word_count))
            if !comments.is_empty() && !updated_at.is_empty() && word_count != 0 =>
        {
            Some(ChapterDetail {
                id,
                title: title.to_string(),
                comment_count,
                updated_at,
                word_count,
            })
        }
        (_, updated_at, words) => {
            tracing::error!(
                "Missing data for chapter {} ({}): comments={:?}, updated_at={:?}, words={:?}",
                id,
                title,
                comments,
                updated_at,
                words
            );
            None
        }
    }
}

/// Returns the text following the last `label` and an optional colon
fn value_after_label<'a>(text: &'a str, label: &str) -> &'a str {
    let rest = text.rsplit(label).next().unwrap_or(text);
    rest.trim_start_matches(|c: char| c == '：' || c == ':' || c.is_whitespace())
        .trim_end()
}
