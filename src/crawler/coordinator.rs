//! Crawler coordinator - main crawl orchestration logic
//!
//! This module owns the browser session and the growing record collection for
//! one crawl:
//! - Loading the listing and discovering match ids
//! - Visiting each match in discovery order
//! - Downgrading failed matches to id-only records
//! - Writing the complete result, or a partial snapshot on abort
//! - Releasing the session exactly once on the way out

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::crawler::builder::{build_record, DetailFields};
use crate::crawler::discovery::discover_ids;
use crate::crawler::extractor::ItemError;
use crate::output::save_snapshot;
use crate::state::{CrawlSession, FinishedSession, ItemRecord, ItemState, SnapshotKind};
use crate::MatchdayError;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How a crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Every discovered match was attempted
    Completed,
    /// The crawl stopped early; the records are a partial snapshot
    Aborted { reason: String },
}

/// Result of one crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub status: CrawlStatus,
    /// Number of ids the listing yielded
    pub discovered: usize,
    /// Records in discovery order
    pub records: Vec<ItemRecord>,
    /// Where the records were written, `None` if writing failed
    pub output_path: Option<PathBuf>,
    pub elapsed: Duration,
}

impl CrawlOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == CrawlStatus::Completed
    }

    /// Records with every mandatory field
    pub fn complete_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_complete()).count()
    }

    /// Records that carry only an id
    pub fn id_only_count(&self) -> usize {
        self.records.len() - self.complete_count()
    }
}

/// Main crawler structure
///
/// Owns the browser session for its whole lifetime; [`Crawler::crawl`]
/// consumes it, so the session cannot outlive the crawl or be released twice.
pub struct Crawler<S: BrowserSession> {
    config: Config,
    session: S,
    fields: DetailFields,
    records: CrawlSession,
}

impl<S: BrowserSession> Crawler<S> {
    /// Creates a crawler over an already opened session
    pub fn new(config: Config, session: S) -> Self {
        let fields = DetailFields::new(&config.selectors, &config.timing);
        Self {
            config,
            session,
            fields,
            records: CrawlSession::default(),
        }
    }

    /// Runs the crawl to completion or abort and returns what was collected
    ///
    /// Never fails: item failures become id-only records, and a crawl-level
    /// failure turns into a partial snapshot with an `Aborted` status.
    pub async fn crawl(mut self) -> CrawlOutcome {
        let start_time = Instant::now();

        let (kind, status) = match self.run().await {
            Ok(()) => (SnapshotKind::Complete, CrawlStatus::Completed),
            Err(e) => {
                tracing::error!(
                    "Crawl aborted after {} records: {}",
                    self.records.len(),
                    e
                );
                (
                    SnapshotKind::Partial,
                    CrawlStatus::Aborted {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let finished = std::mem::take(&mut self.records).finalize(kind);
        let output_path = self.save(&finished);

        if let Err(e) = self.session.release().await {
            tracing::warn!("Failed to release browser session: {}", e);
        }

        CrawlOutcome {
            status,
            discovered: finished.discovered,
            records: finished.records,
            output_path,
            elapsed: start_time.elapsed(),
        }
    }

    /// Loads the listing, discovers ids and visits each match
    async fn run(&mut self) -> Result<(), MatchdayError> {
        let listing_url = self.config.site.listing_url();
        tracing::info!("Loading listing {}", listing_url);
        self.session.navigate(&listing_url).await?;

        let mut ids =
            discover_ids(&mut self.session, &self.config.selectors, &self.config.timing).await?;
        tracing::info!("Discovered {} matches", ids.len());

        self.records = CrawlSession::new(ids.len());

        if let Some(max_items) = self.config.crawl.max_items {
            if ids.len() > max_items {
                tracing::info!("Visiting the first {} of {} matches", max_items, ids.len());
                ids.truncate(max_items);
            }
        }

        let total = ids.len();
        for (index, id) in ids.iter().enumerate() {
            let record = match self.visit(id).await {
                Ok(record) => record,
                Err(e) if e.is_fatal() => {
                    return Err(MatchdayError::SessionFatal(e.to_string()));
                }
                Err(e) => {
                    tracing::warn!("Match {} recorded without details: {}", id, e);
                    ItemRecord::id_only(id.as_str())
                }
            };
            self.records.append(record);

            if (index + 1) % 10 == 0 {
                tracing::info!("Progress: {}/{} matches visited", index + 1, total);
            }
        }

        tracing::info!("Visited all {} matches", total);
        Ok(())
    }

    /// Runs one match through `Pending → Navigating → Extracting → Complete/Failed`
    async fn visit(&mut self, id: &str) -> Result<ItemRecord, ItemError> {
        let mut state = ItemState::Pending;
        let url = self.config.site.detail_url(id);

        advance(id, &mut state, ItemState::Navigating);
        if let Err(e) = self.session.navigate(&url).await {
            advance(id, &mut state, ItemState::Failed);
            return Err(ItemError::Navigation(e));
        }

        advance(id, &mut state, ItemState::Extracting);
        match build_record(&mut self.session, id, &self.fields).await {
            Ok(record) => {
                advance(id, &mut state, ItemState::Complete);
                Ok(record)
            }
            Err(e) => {
                advance(id, &mut state, ItemState::Failed);
                Err(e)
            }
        }
    }

    fn save(&self, finished: &FinishedSession) -> Option<PathBuf> {
        let path = match finished.kind {
            SnapshotKind::Complete => self.config.output.full_path(),
            SnapshotKind::Partial => self.config.output.partial_path(),
        };
        save_snapshot(&path, &finished.records)
    }
}

fn advance(id: &str, state: &mut ItemState, next: ItemState) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {} -> {}",
        state,
        next
    );
    tracing::debug!("Match {}: {} -> {}", id, state, next);
    *state = next;
}
