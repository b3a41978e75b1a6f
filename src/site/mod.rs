//! Page addresses on the target site
//!
//! Every request the crawler makes goes to one of four URL shapes on a single
//! host. This module builds them from the configured base URL and resolves
//! relative links found in scraped markup.

use crate::HarvestError;
use url::Url;

/// URL builder anchored at the site's base URL
#[derive(Debug, Clone)]
pub struct Site {
    base: Url,
}

impl Site {
    /// Creates a site from its base URL
    ///
    /// # Errors
    ///
    /// Fails when `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, HarvestError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(HarvestError::UrlParse(url::ParseError::RelativeUrlWithoutBase));
        }
        Ok(Self { base })
    }

    /// `/chapter-list/{book_id}/book_detail`
    pub fn chapter_list_url(&self, book_id: u64) -> Url {
        self.with_segments(&["chapter-list", &book_id.to_string(), "book_detail"])
    }

    /// `/chapter/{chapter_id}`
    pub fn chapter_url(&self, chapter_id: u64) -> Url {
        self.with_segments(&["chapter", &chapter_id.to_string()])
    }

    /// `/book/{book_id}`
    pub fn book_url(&self, book_id: u64) -> Url {
        self.with_segments(&["book", &book_id.to_string()])
    }

    /// `/get-search-book-list/0-0-0-0-0-0/全部/{query}/{page}`
    ///
    /// The query is percent-encoded as a single path segment, so slashes in a
    /// book name cannot change the route.
    pub fn search_url(&self, query: &str, page: u32) -> Url {
        self.with_segments(&[
            "get-search-book-list",
            "0-0-0-0-0-0",
            "全部",
            query,
            &page.to_string(),
        ])
    }

    /// Resolves a link from scraped markup to an absolute URL
    ///
    /// Links already starting with `http` are returned untouched; anything
    /// else is joined onto the base URL. Empty or unjoinable links yield `None`.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        if href.starts_with("http") {
            return Some(href.to_string());
        }
        self.base.join(href).ok().map(|url| url.to_string())
    }

    /// Extracts the book id from a `/book/{id}` link on this site
    pub fn book_id_from_href(&self, href: &str) -> Option<u64> {
        let url = Url::parse(&self.resolve(href)?).ok()?;
        if url.host_str() != self.base.host_str() {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["book", id] if id.chars().all(|c| c.is_ascii_digit()) => id.parse().ok(),
            _ => None,
        }
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
