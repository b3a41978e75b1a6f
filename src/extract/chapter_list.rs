use scraper::Html;

use super::selector;
use crate::model::ChapterRef;

/// Parses a chapter-index page into its most recent `n` chapters
///
/// Every anchor inside a `ul.book-chapter-list` contributes one chapter: the
/// last path segment of its `href` is the chapter id and its text is the
/// title. Chapters are sorted ascending by id and the last `n` are returned,
/// so "most recent" means "highest id".
///
/// Any malformed anchor fails the whole page, and the failure is reported as
/// an empty list. Callers must read an empty result as "could not list
/// chapters", not "the book has no chapters".
pub fn parse_chapter_list(html: &str, n: usize) -> Vec<ChapterRef> {
    match collect_chapters(html) {
        Ok(mut chapters) => {
            chapters.sort_by_key(|chapter| chapter.id);
            let skip = chapters.len().saturating_sub(n);
            chapters.split_off(skip)
        }
        Err(message) => {
            tracing::error!("Failed to parse chapter list: {}", message);
            Vec::new()
        }
    }
}

fn collect_chapters(html: &str) -> Result<Vec<ChapterRef>, String> {
    let document = Html::parse_document(html);
    let list_selector =
        selector("ul.book-chapter-list").ok_or_else(|| "bad list selector".to_string())?;
    let anchor_selector = selector("a").ok_or_else(|| "bad anchor selector".to_string())?;

    let mut chapters = Vec::new();
    for list in document.select(&list_selector) {
        for anchor in list.select(&anchor_selector) {
            let href = anchor
                .value()
                .attr("href")
                .ok_or_else(|| format!("anchor without href: {}", anchor.html()))?;
            let id = chapter_id_from_href(href)
                .ok_or_else(|| format!("no chapter id in href {:?}", href))?;
            chapters.push(ChapterRef::new(id, anchor.text().collect::<String>().trim()));
        }
    }

    tracing::debug!("Found {} chapter anchors", chapters.len());
    Ok(chapters)
}

/// Parses the trailing path segment of a chapter link as its id
fn chapter_id_from_href(href: &str) -> Option<u64> {
    href.rsplit('/').next()?.trim().parse().ok()
}
