//! Run statistics and console summary
//!
//! This module reduces the throughput results of a run to the figures shown
//! at the end: the speed ranking, its average, and the failures.

use crate::speedtest::{to_mebibytes, SpeedTestResult};

/// A provider's place in the speed ranking
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSpeed {
    pub name: String,
    pub speed_mbps: f64,
}

/// Run statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    /// Providers the crawler was run against
    pub providers_checked: usize,

    /// Providers for which a snapshot URL was found
    pub snapshots_found: usize,

    /// Throughput tests run
    pub total_tests: usize,

    /// Throughput tests that succeeded
    pub successful: usize,

    /// Mean speed over successful tests
    pub average_mbps: Option<f64>,

    /// Successful tests, fastest first; ties keep test order
    pub ranking: Vec<RankedSpeed>,

    /// Failed endpoints as `(name, error)`
    pub failures: Vec<(String, String)>,
}

impl RunStatistics {
    /// Computes statistics from crawl counts and throughput results
    pub fn compute(
        providers_checked: usize,
        snapshots_found: usize,
        results: &[SpeedTestResult],
    ) -> Self {
        let mut ranking: Vec<RankedSpeed> = results
            .iter()
            .filter(|r| r.is_success())
            .filter_map(|r| {
                r.speed_mbps.map(|speed_mbps| RankedSpeed {
                    name: r.name.clone(),
                    speed_mbps,
                })
            })
            .collect();
        ranking.sort_by(|a, b| b.speed_mbps.total_cmp(&a.speed_mbps));

        let average_mbps = if ranking.is_empty() {
            None
        } else {
            let total: f64 = ranking.iter().map(|r| r.speed_mbps).sum();
            Some(total / ranking.len() as f64)
        };

        let failures = results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| (r.name.clone(), r.error.clone().unwrap_or_default()))
            .collect();

        Self {
            providers_checked,
            snapshots_found,
            total_tests: results.len(),
            successful: ranking.len(),
            average_mbps,
            ranking,
            failures,
        }
    }

    pub fn fastest(&self) -> Option<&RankedSpeed> {
        self.ranking.first()
    }

    pub fn slowest(&self) -> Option<&RankedSpeed> {
        self.ranking.last()
    }
}

/// Formats the end-of-run summary
pub fn format_summary(stats: &RunStatistics) -> String {
    let mut out = String::new();
    out.push_str("Test Summary:\n");
    out.push_str("----------------------------------------\n");
    out.push_str(&format!(
        "Snapshots found: {}/{} providers\n",
        stats.snapshots_found, stats.providers_checked
    ));

    if let Some(average) = stats.average_mbps {
        out.push_str(&format!("Average Speed: {:.2} Mbps\n", average));
    }
    if let Some(fastest) = stats.fastest() {
        out.push_str(&format!(
            "Fastest: {} ({:.2} Mbps)\n",
            fastest.name, fastest.speed_mbps
        ));
    }
    if let Some(slowest) = stats.slowest() {
        out.push_str(&format!(
            "Slowest: {} ({:.2} Mbps)\n",
            slowest.name, slowest.speed_mbps
        ));
    }
    out.push_str(&format!(
        "Successful tests: {}/{}\n",
        stats.successful, stats.total_tests
    ));

    if !stats.ranking.is_empty() {
        out.push_str("\nRanking:\n");
        for (place, entry) in stats.ranking.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {} ({:.2} Mbps)\n",
                place + 1,
                entry.name,
                entry.speed_mbps
            ));
        }
    }

    if !stats.failures.is_empty() {
        out.push_str("\nFailed endpoints:\n");
        for (name, error) in &stats.failures {
            out.push_str(&format!("- {}: {}\n", name, error));
        }
    }

    out
}

/// Prints the end-of-run summary to stdout
pub fn print_summary(stats: &RunStatistics) {
    println!();
    print!("{}", format_summary(stats));
}

/// Formats the result block of one throughput test
pub fn format_result(result: &SpeedTestResult) -> String {
    let mut out = String::new();
    out.push_str("----------------------------------------\n");
    out.push_str(&format!("Results for {}:\n", result.name));
    match (result.speed_mbps, result.bytes_received) {
        (Some(speed), Some(bytes)) if result.is_success() => {
            out.push_str(&format!("Final Speed: {:.2} Mbps\n", speed));
            out.push_str(&format!("Total Data: {:.2} MiB\n", to_mebibytes(bytes)));
        }
        _ => {
            out.push_str(&format!(
                "Error: {}\n",
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    out.push_str("----------------------------------------\n");
    out
}

/// Prints the result block of one throughput test to stdout
pub fn print_result(result: &SpeedTestResult) {
    print!("{}", format_result(result));
}
