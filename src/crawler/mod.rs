//! Crawler module for fetching and orchestration
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with pacing and retry logic
//! - Concurrency and start-rate limiting for chapter batches
//! - Overall coordination of the public operations

mod coordinator;
mod fetcher;
mod governor;

pub use coordinator::{Harvester, SearchLookup, NOT_FOUND_MESSAGE};
pub use fetcher::{build_http_client, FetchOutcome, Fetcher};
pub use governor::Governor;

use crate::config::Config;
use crate::model::ChapterDetail;
use crate::HarvestError;

/// Harvests the `n` most recent chapters of a book with the given configuration
///
/// Convenience wrapper over [`Harvester::get_recent_chapters`].
///
/// # Returns
///
/// * `Ok(Vec<ChapterDetail>)` - Valid chapters, ascending by id (may be empty)
/// * `Err(HarvestError)` - The configuration could not be used
pub async fn harvest_recent(
    config: Config,
    book_id: u64,
    n: usize,
) -> Result<Vec<ChapterDetail>, HarvestError> {
    let harvester = Harvester::new(config)?;
    Ok(harvester.get_recent_chapters(book_id, n).await)
}
