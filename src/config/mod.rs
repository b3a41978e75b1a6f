//! Configuration module for cwm-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; the defaults mirror the site's tolerated request rate.
//!
//! # Example
//!
//! ```no_run
//! use cwm_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cwm-harvest.toml")).unwrap();
//! println!("At most {} chapter fetches in flight", config.governor.max_at_once);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, GovernorConfig, HeaderConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::validate;
