//! Output module for crawl results
//!
//! This module handles:
//! - Encoding records as CSV and writing complete or partial snapshots
//! - Summarizing a crawl outcome for the operator

pub mod stats;
mod tabular;

pub use stats::{print_statistics, CrawlStatistics};
pub use tabular::{save_snapshot, serialize_records, write_records};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
