//! HTML extractors for the four page types
//!
//! Every extractor is defensive: markup that is missing or malformed degrades
//! to an empty collection, a dropped record or a per-field sentinel, and
//! never to a panic or an error crossing into the crawler.
//!
//! - [`parse_chapter_list`] - chapter-index page to the most recent chapters
//! - [`parse_chapter_detail`] - chapter page to a complete record or nothing
//! - [`parse_book_details`] - book page to a best-effort record
//! - [`parse_search_results`] / [`parse_search_ids`] - search-results page

mod book_detail;
mod chapter_detail;
mod chapter_list;
mod numbers;
mod search;
mod timestamp;

pub use book_detail::parse_book_details;
pub use chapter_detail::parse_chapter_detail;
pub use chapter_list::parse_chapter_list;
pub use numbers::normalize_number;
pub use search::{parse_search_ids, parse_search_results};
pub use timestamp::{format_timestamp, parse_site_timestamp, parse_update_text};

use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector, logging instead of panicking on a bad pattern
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::error!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}

/// Returns the first element of the document matching `css`
pub(crate) fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    document.select(&selector).next()
}

/// Returns the first descendant of `element` matching `css`
pub(crate) fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css)?;
    element.select(&selector).next()
}

/// Text of an element with each text node trimmed and joined by one space
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
