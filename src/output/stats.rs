//! Statistics for a finished crawl
//!
//! Summarizes a [`CrawlOutcome`] for the operator: how many matches were
//! found, how many came back complete, and whether the run was cut short.

use crate::crawler::{CrawlOutcome, CrawlStatus};
use std::path::PathBuf;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Ids the listing yielded
    pub discovered: usize,

    /// Records collected (complete plus id-only)
    pub recorded: usize,

    /// Records with every mandatory field
    pub complete: usize,

    /// Records that carry only an id
    pub id_only: usize,

    /// Abort reason, `None` when every match was attempted
    pub aborted: Option<String>,

    pub output_path: Option<PathBuf>,

    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let aborted = match &outcome.status {
            CrawlStatus::Completed => None,
            CrawlStatus::Aborted { reason } => Some(reason.clone()),
        };

        Self {
            discovered: outcome.discovered,
            recorded: outcome.records.len(),
            complete: outcome.complete_count(),
            id_only: outcome.id_only_count(),
            aborted,
            output_path: outcome.output_path.clone(),
            elapsed: outcome.elapsed,
        }
    }

    /// Share of recorded matches that came back complete, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.recorded == 0 {
            return 0.0;
        }
        (self.complete as f64 / self.recorded as f64) * 100.0
    }

    /// One-line verdict for logs and the terminal
    pub fn headline(&self) -> String {
        match &self.aborted {
            None => format!(
                "Completed with {} full and {} id-only records",
                self.complete, self.id_only
            ),
            Some(reason) => format!(
                "Aborted with {} records salvaged ({})",
                self.recorded, reason
            ),
        }
    }
}

/// Prints crawl statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Matchday Crawl Statistics ===\n");
    println!("{}\n", stats.headline());
    println!("Matches discovered: {}", stats.discovered);
    println!("Records written:    {}", stats.recorded);
    println!("  Complete:         {}", stats.complete);
    println!("  Id-only:          {}", stats.id_only);
    println!("Success rate:       {:.2}%", stats.success_rate());
    println!("Elapsed:            {:.1}s", stats.elapsed.as_secs_f64());

    match &stats.output_path {
        Some(path) => println!("Output:             {}", path.display()),
        None => println!("Output:             not written (see log)"),
    }
}
