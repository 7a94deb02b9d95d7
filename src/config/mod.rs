//! Configuration module for Matchday
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file (or no file at all) describes a
//! crawl of the live results site.
//!
//! # Example
//!
//! ```no_run
//! use matchday::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("matchday.toml")).unwrap();
//! println!("Listing: {}", config.site.listing_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlConfig, OutputConfig, SelectorConfig, SiteConfig, TimingConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
