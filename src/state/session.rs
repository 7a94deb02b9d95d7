//! Append-only record collection for one crawl

use crate::state::record::ItemRecord;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    /// Every discovered match was attempted
    Complete,
    /// The crawl aborted; only what was collected so far
    Partial,
}

/// Records collected during a crawl, in discovery order
///
/// Records are only ever appended. Finalizing consumes the session, so a
/// session is finalized at most once.
#[derive(Debug, Default)]
pub struct CrawlSession {
    discovered: usize,
    records: Vec<ItemRecord>,
}

impl CrawlSession {
    /// Starts a session for `discovered` matches
    pub fn new(discovered: usize) -> Self {
        Self {
            discovered,
            records: Vec::with_capacity(discovered),
        }
    }

    pub fn append(&mut self, record: ItemRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of ids the listing yielded
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    pub fn finalize(self, kind: SnapshotKind) -> FinishedSession {
        FinishedSession {
            kind,
            discovered: self.discovered,
            records: self.records,
        }
    }
}

/// A session after its last record
#[derive(Debug, Clone)]
pub struct FinishedSession {
    pub kind: SnapshotKind,
    pub discovered: usize,
    pub records: Vec<ItemRecord>,
}

impl FinishedSession {
    /// Records with more than an id
    pub fn complete_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_complete()).count()
    }

    /// Records that carry only an id
    pub fn id_only_count(&self) -> usize {
        self.records.len() - self.complete_count()
    }
}
