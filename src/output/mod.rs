//! Output module for run summaries and reports
//!
//! This module handles:
//! - Assembling crawl outcomes and throughput results into a [`RunReport`]
//! - Computing and printing summary statistics
//! - Writing the JSON report file

mod report;
pub mod stats;

pub use report::{report_file_name, write_json_report, REPORT_PREFIX};
pub use stats::{
    format_result, format_summary, print_result, print_summary, RankedSpeed, RunStatistics,
};

use crate::crawler::SnapshotCandidate;
use crate::speedtest::SpeedTestResult;
use chrono::{DateTime, Utc};

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One entry per provider, found or not
    pub candidates: Vec<SnapshotCandidate>,
    /// One entry per tested candidate, in test order
    pub results: Vec<SpeedTestResult>,
}

impl RunReport {
    /// Assembles a report, stamping the finish time now
    pub fn assemble(
        started_at: DateTime<Utc>,
        candidates: Vec<SnapshotCandidate>,
        results: Vec<SpeedTestResult>,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            candidates,
            results,
        }
    }

    /// Names of providers on which no snapshot was found
    pub fn providers_without_snapshot(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .filter(|c| !c.is_found())
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn statistics(&self) -> RunStatistics {
        let found = self.candidates.iter().filter(|c| c.is_found()).count();
        RunStatistics::compute(self.candidates.len(), found, &self.results)
    }
}
