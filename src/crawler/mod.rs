//! Crawler module for listing discovery and match extraction
//!
//! This module contains the core crawling logic, including:
//! - Driving the lazily-loaded listing until it stops growing
//! - Reading fields off each match's detail page
//! - Isolating per-match failures
//! - Overall crawl coordination and the terminal save

mod builder;
mod coordinator;
mod discovery;
mod extractor;

pub use builder::{build_record, DetailFields};
pub use coordinator::{CrawlOutcome, CrawlStatus, Crawler};
pub use discovery::{discover_ids, LOAD_MORE_SCRIPT};
pub use extractor::{
    extract_field, kickoff_date, split_score, FieldKind, FieldSpec, FieldValue, ItemError,
};

use crate::browser::WebDriverSession;
use crate::config::Config;
use crate::MatchdayError;

/// Runs a complete crawl against a live browser
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open a WebDriver session with the configured browser settings
/// 2. Discover every match on the results listing
/// 3. Visit and extract each match
/// 4. Write the complete result, or a partial snapshot on abort
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ran; check its status for an abort
/// * `Err(MatchdayError)` - No browser session could be opened
pub async fn crawl(config: Config) -> Result<CrawlOutcome, MatchdayError> {
    let session = WebDriverSession::connect(&config.browser).await?;
    Ok(Crawler::new(config, session).crawl().await)
}
