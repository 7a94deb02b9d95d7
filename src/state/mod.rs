//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `ItemState`: where a single match is in its visit
//! - `ItemRecord`: the fields recovered for one match
//! - `CrawlSession`: the append-only collection of records for one crawl

mod item_state;
mod record;
mod session;

// Re-export main types
pub use item_state::ItemState;
pub use record::{ItemRecord, COLUMNS};
pub use session::{CrawlSession, FinishedSession, SnapshotKind};
