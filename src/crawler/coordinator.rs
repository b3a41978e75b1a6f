//! Harvest coordinator - orchestration of fetch, extract and aggregate
//!
//! This module ties the pieces together for each public operation:
//! - Building a client scoped to the call
//! - Fetching and parsing the chapter index
//! - Fanning chapter-detail fetches out through the governor
//! - One-shot search and book-page lookups

use crate::config::Config;
use crate::crawler::{Fetcher, Governor};
use crate::extract::{
    parse_book_details, parse_chapter_detail, parse_chapter_list, parse_search_ids,
    parse_search_results,
};
use crate::model::{BookDetail, ChapterDetail, ChapterRef, SearchResultItem};
use crate::site::Site;
use crate::HarvestError;
use std::fmt;

/// Shown when a name search finds nothing
pub const NOT_FOUND_MESSAGE: &str = "未能搜到该书籍";

/// Result of looking a book up by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchLookup {
    /// `(title, book id)` pairs in page order, titles unique
    Matches(Vec<(String, u64)>),

    /// The search page listed no books
    NotFound,
}

impl SearchLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchLookup::Matches(_))
    }

    /// Book id for an exact title, if present
    pub fn id_of(&self, title: &str) -> Option<u64> {
        match self {
            SearchLookup::Matches(matches) => matches
                .iter()
                .find(|(candidate, _)| candidate == title)
                .map(|(_, id)| *id),
            SearchLookup::NotFound => None,
        }
    }
}

impl fmt::Display for SearchLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLookup::NotFound => write!(f, "{}", NOT_FOUND_MESSAGE),
            SearchLookup::Matches(matches) => {
                for (index, (title, id)) in matches.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}:{}", title, id)?;
                }
                Ok(())
            }
        }
    }
}

/// Entry point for every harvesting operation
///
/// A `Harvester` holds only configuration. Each operation creates its own
/// HTTP client, and that client is dropped when the operation returns.
#[derive(Debug, Clone)]
pub struct Harvester {
    config: Config,
    site: Site,
}

impl Harvester {
    /// Creates a new harvester
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run operations
    /// * `Err(HarvestError)` - The configured base URL is unusable
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let site = Site::new(&config.site.base_url)?;
        Ok(Self { config, site })
    }

    /// Harvests statistics for the `n` most recent chapters of a book
    ///
    /// Returns valid records in ascending chapter-id order. Chapters whose
    /// fetch or parse fails are left out. An empty result means either the
    /// index could not be listed or every chapter failed; it never means the
    /// book has no chapters.
    pub async fn get_recent_chapters(&self, book_id: u64, n: usize) -> Vec<ChapterDetail> {
        let fetcher = match Fetcher::from_config(&self.config) {
            Ok(fetcher) => fetcher,
            Err(e) => {
                tracing::error!("Failed to build HTTP client: {}", e);
                return Vec::new();
            }
        };

        let chapters = self.get_chapter_list(&fetcher, book_id, n).await;
        if chapters.is_empty() {
            tracing::warn!("No chapters listed for book {}", book_id);
            return Vec::new();
        }

        let attempted = chapters.len();
        tracing::info!("Fetching {} chapters of book {}", attempted, book_id);

        let governor = Governor::from_config(&self.config.governor);
        let tasks: Vec<_> = chapters
            .into_iter()
            .map(|chapter| self.get_chapter_detail(&fetcher, chapter))
            .collect();

        let details: Vec<ChapterDetail> = governor
            .run_all(tasks)
            .await
            .into_iter()
            .flatten()
            .flatten()
            .collect();

        tracing::info!(
            "Kept {} of {} chapters for book {}",
            details.len(),
            attempted,
            book_id
        );
        details
    }

    /// Fetches and parses the chapter index of a book
    async fn get_chapter_list(
        &self,
        fetcher: &Fetcher,
        book_id: u64,
        n: usize,
    ) -> Vec<ChapterRef> {
        let url = self.site.chapter_list_url(book_id);
        match fetcher.fetch(url.as_str()).await.into_body() {
            Some(html) => parse_chapter_list(&html, n),
            None => {
                tracing::error!("Could not fetch chapter list for book {}", book_id);
                Vec::new()
            }
        }
    }

    /// Fetches and parses one chapter page
    async fn get_chapter_detail(
        &self,
        fetcher: &Fetcher,
        chapter: ChapterRef,
    ) -> Option<ChapterDetail> {
        let url = self.site.chapter_url(chapter.id);
        let html = fetcher.fetch(url.as_str()).await.into_body()?;
        parse_chapter_detail(&html, chapter.id, &chapter.title)
    }

    /// Looks a book up by name on the first search page
    ///
    /// One request with no pacing and no retry.
    pub async fn search_book_by_name(&self, name: &str) -> Result<SearchLookup, HarvestError> {
        let html = self.fetch_page(self.site.search_url(name, 1).as_str()).await?;
        let matches = parse_search_ids(&html, &self.site);

        tracing::info!("Search for {:?} matched {} books", name, matches.len());
        if matches.is_empty() {
            Ok(SearchLookup::NotFound)
        } else {
            Ok(SearchLookup::Matches(matches))
        }
    }

    /// Returns the full result items of one search page
    pub async fn search_books(
        &self,
        name: &str,
        page: u32,
    ) -> Result<Vec<SearchResultItem>, HarvestError> {
        let html = self.fetch_page(self.site.search_url(name, page).as_str()).await?;
        let results = parse_search_results(&html, &self.site);
        tracing::info!("Search for {:?} page {} returned {} items", name, page, results.len());
        Ok(results)
    }

    /// Fetches and parses a book's main page
    pub async fn get_book_details(&self, book_id: u64) -> Result<BookDetail, HarvestError> {
        let html = self.fetch_page(self.site.book_url(book_id).as_str()).await?;
        Ok(parse_book_details(&html, &self.site))
    }

    async fn fetch_page(&self, url: &str) -> Result<String, HarvestError> {
        Fetcher::from_config(&self.config)?.fetch_once(url).await
    }
}
