//! Run orchestration
//!
//! provider list → locator (per provider) → candidate URL or nothing →
//! found candidates → throughput tester (one at a time) → report.
//!
//! Per-provider and per-candidate failures never abort the run; only the
//! provider list and the report file can fail it.

use crate::config::Config;
use crate::crawler::{SnapshotCandidate, SnapshotLocator};
use crate::output::{write_json_report, RunReport};
use crate::providers::{ProducerRegistry, Provider, ProviderSource, StaticProviders};
use crate::speedtest::{ProgressCallback, SpeedTestResult, ThroughputTester};
use crate::url::SitePolicy;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};

/// Picks the provider source: the configured list if any, else the registry
pub fn provider_source(config: &Config) -> crate::Result<Box<dyn ProviderSource>> {
    if !config.providers.is_empty() {
        return Ok(Box::new(StaticProviders::from_entries(&config.providers)));
    }
    let registry = ProducerRegistry::new(&config.registry, &config.crawler.user_agent)?;
    Ok(Box::new(registry))
}

/// Candidates that have a snapshot URL to test
pub fn testable(candidates: &[SnapshotCandidate]) -> Vec<&SnapshotCandidate> {
    candidates.iter().filter(|c| c.is_found()).collect()
}

/// Locator, tester, and output settings for one run
#[derive(Debug)]
pub struct Pipeline {
    locator: SnapshotLocator,
    tester: ThroughputTester,
    workers: usize,
    output_dir: PathBuf,
}

impl Pipeline {
    pub fn new(
        locator: SnapshotLocator,
        tester: ThroughputTester,
        workers: usize,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            locator,
            tester,
            workers: workers.max(1),
            output_dir,
        }
    }

    /// Builds a pipeline with the default site policy
    ///
    /// `progress`, if given, observes every throughput measurement.
    pub fn from_config(config: &Config, progress: Option<ProgressCallback>) -> crate::Result<Self> {
        let locator = SnapshotLocator::new(&config.crawler, SitePolicy::default())?;
        let mut tester = ThroughputTester::new(&config.speed_test, &config.crawler.user_agent)?;
        if let Some(progress) = progress {
            tester = tester.with_progress(progress);
        }
        Ok(Self::new(
            locator,
            tester,
            config.crawler.workers,
            PathBuf::from(&config.output.directory),
        ))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Locates a snapshot for every provider
    ///
    /// Up to `workers` providers are crawled at once, each with its own crawl
    /// context. Candidates come back in provider order.
    pub async fn locate(&self, providers: &[Provider]) -> Vec<SnapshotCandidate> {
        stream::iter(providers)
            .map(|provider| async move {
                tracing::info!("Checking provider: {} ({})", provider.name, provider.url);
                let snapshot_url = self.locator.locate(&provider.url).await;
                if snapshot_url.is_none() {
                    tracing::info!("No snapshot found for {}", provider.name);
                }
                SnapshotCandidate::new(provider.name.clone(), snapshot_url)
            })
            .buffered(self.workers)
            .collect()
            .await
    }

    /// Tests candidates strictly one after another
    ///
    /// `on_result` sees each result as soon as its test finishes.
    pub async fn measure(
        &self,
        candidates: &[&SnapshotCandidate],
        mut on_result: impl FnMut(&SpeedTestResult),
    ) -> Vec<SpeedTestResult> {
        tracing::info!(
            "Testing {} endpoints for {:.0} seconds each",
            candidates.len(),
            self.tester.duration().as_secs_f64()
        );

        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let result = self.tester.measure(candidate).await;
            on_result(&result);
            results.push(result);
        }
        results
    }

    /// Locates, measures, and writes the JSON report
    ///
    /// Returns the assembled report and the path of the report file.
    pub async fn run(
        &self,
        providers: &[Provider],
        on_result: impl FnMut(&SpeedTestResult),
    ) -> crate::Result<(RunReport, PathBuf)> {
        let started_at = Utc::now();
        let candidates = self.locate(providers).await;

        let results = {
            let found = testable(&candidates);
            tracing::info!("Found {} snapshots across {} providers", found.len(), providers.len());
            self.measure(&found, on_result).await
        };

        let report = RunReport::assemble(started_at, candidates, results);
        let path = write_json_report(&self.output_dir, &report.results, &report.finished_at)?;
        Ok((report, path))
    }
}
