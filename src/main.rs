//! cwm-harvest main entry point
//!
//! This is the command-line interface for the Ciweimao chapter harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use cwm_harvest::config::{load_or_default, Config};
use cwm_harvest::output::{book_summary, chapter_table, search_summary};
use cwm_harvest::Harvester;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// cwm-harvest: a polite Ciweimao chapter and book harvester
///
/// Collects per-chapter statistics for a book's most recent chapters,
/// looks books up by name, and summarizes book and search pages.
#[derive(Parser, Debug)]
#[command(name = "cwm-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite Ciweimao chapter harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest statistics for the most recent chapters of a book
    Chapters {
        /// Numeric book id
        book_id: u64,

        /// How many of the latest chapters to harvest
        #[arg(default_value_t = 50)]
        count: usize,
    },

    /// Look a book up by name and print `title:id` pairs
    Search {
        /// Book name to search for
        name: String,
    },

    /// Summarize one page of search results
    Results {
        /// Book name to search for
        name: String,

        /// Result page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Maximum number of results to print
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },

    /// Summarize a book's main page
    Book {
        /// Numeric book id
        book_id: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;
    let harvester = Harvester::new(config).context("Invalid site configuration")?;

    match cli.command {
        Command::Chapters { book_id, count } => handle_chapters(&harvester, book_id, count).await,
        Command::Search { name } => handle_search(&harvester, &name).await,
        Command::Results { name, page, limit } => {
            handle_results(&harvester, &name, page, limit).await
        }
        Command::Book { book_id } => handle_book(&harvester, book_id).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cwm_harvest=info,warn"),
            1 => EnvFilter::new("cwm_harvest=debug,info"),
            2 => EnvFilter::new("cwm_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let config =
        load_or_default(path.map(PathBuf::as_path)).context("Failed to load configuration")?;
    tracing::debug!(
        "Base URL {}, {} retries, {} at once, {} per second",
        config.site.base_url,
        config.fetcher.retry_times,
        config.governor.max_at_once,
        config.governor.max_per_second
    );
    Ok(config)
}

/// Handles the `chapters` command
async fn handle_chapters(harvester: &Harvester, book_id: u64, count: usize) -> anyhow::Result<()> {
    tracing::info!("Harvesting the latest {} chapters of book {}", count, book_id);

    let chapters = harvester.get_recent_chapters(book_id, count).await;
    if chapters.is_empty() {
        println!("could not retrieve data");
        return Ok(());
    }

    print!("{}", chapter_table(&chapters));
    Ok(())
}

/// Handles the `search` command
async fn handle_search(harvester: &Harvester, name: &str) -> anyhow::Result<()> {
    let lookup = harvester
        .search_book_by_name(name)
        .await
        .with_context(|| format!("Search for {:?} failed", name))?;

    println!("{}", lookup);
    Ok(())
}

/// Handles the `results` command
async fn handle_results(
    harvester: &Harvester,
    name: &str,
    page: u32,
    limit: usize,
) -> anyhow::Result<()> {
    let items = harvester
        .search_books(name, page)
        .await
        .with_context(|| format!("Search for {:?} (page {}) failed", name, page))?;

    print!("{}", search_summary(&items, name, limit));
    Ok(())
}

/// Handles the `book` command
async fn handle_book(harvester: &Harvester, book_id: u64) -> anyhow::Result<()> {
    let book = harvester
        .get_book_details(book_id)
        .await
        .with_context(|| format!("Failed to fetch book {}", book_id))?;

    print!("{}", book_summary(&book));
    Ok(())
}
