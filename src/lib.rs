//! Matchday: a results-listing crawler
//!
//! This crate drives a browser session over a lazily-loaded listing of match
//! results, visits each match's detail page, extracts a fixed set of fields and
//! writes the aggregated records to a CSV file. When the crawl cannot continue,
//! whatever was collected so far is written as a partial snapshot.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for crawl-level failures
///
/// Per-item failures never surface here; they are absorbed by the
/// orchestrator and turned into id-only records.
#[derive(Debug, Error)]
pub enum MatchdayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Listing did not stabilize after {triggers} load triggers ({last_count} items rendered)")]
    DiscoveryTimeout { triggers: u32, last_count: usize },

    #[error("Browser session became unusable: {0}")]
    SessionFatal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, MatchdayError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use browser::{BrowserSession, ElementHandle};
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlStatus, Crawler};
pub use state::{CrawlSession, ItemRecord, ItemState};
