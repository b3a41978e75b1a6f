//! Output module for rendering harvest results
//!
//! Records are `Serialize`, so structured consumers can take them as they
//! are. This module provides the plain-text renderings used by the CLI.

mod text;

pub use text::{book_summary, chapter_table, search_summary};
