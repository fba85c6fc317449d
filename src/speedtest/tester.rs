//! Throughput tester
//!
//! Streams a snapshot download for a fixed window and reports the achieved
//! rate. Archives are many gigabytes, so the transfer is always cut short:
//! once the window closes the response is dropped, which aborts the body
//! stream and releases the connection.

use crate::config::SpeedTestConfig;
use crate::crawler::SnapshotCandidate;
use crate::speedtest::{Measurement, SpeedTestResult};
use chrono::Utc;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Observer invoked after every received chunk and once with the final figures
pub type ProgressCallback = Arc<dyn Fn(&Measurement) + Send + Sync>;

/// Reasons a throughput test produced no measurement
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("No data received within {0:?}")]
    NoData(Duration),
}

/// Builds the client used for snapshot downloads
///
/// Content decoding is disabled so the byte count is what went over the wire.
pub fn build_transfer_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .no_gzip()
        .no_brotli()
        .build()
}

/// Measures download throughput of snapshot candidates, one at a time
#[derive(Clone)]
pub struct ThroughputTester {
    client: Client,
    duration: Duration,
    grace: Duration,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for ThroughputTester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThroughputTester")
            .field("duration", &self.duration)
            .field("grace", &self.grace)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl ThroughputTester {
    pub fn new(config: &SpeedTestConfig, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = build_transfer_client(user_agent)?;
        Ok(Self::with_client(client, config.duration(), config.timeout_grace()))
    }

    pub fn with_client(client: Client, duration: Duration, grace: Duration) -> Self {
        Self {
            client,
            duration,
            grace,
            progress: None,
        }
    }

    /// Registers a progress observer
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Runs one throughput test
    ///
    /// Never fails: a missing URL, a network error, a non-success status, or
    /// a silent server all become an `error` result.
    pub async fn measure(&self, candidate: &SnapshotCandidate) -> SpeedTestResult {
        let timestamp = Utc::now();
        let Some(url) = candidate.snapshot_url.as_deref() else {
            return SpeedTestResult::failure(&candidate.name, "", timestamp, "No snapshot URL");
        };

        tracing::info!("Testing {} ({})", candidate.name, url);
        match self.transfer(url).await {
            Ok(measurement) => {
                tracing::info!(
                    "{}: {:.2} Mbps ({:.2} MiB received)",
                    candidate.name,
                    measurement.mbps(),
                    measurement.mebibytes()
                );
                SpeedTestResult::success(&candidate.name, url, timestamp, &measurement)
            }
            Err(e) => {
                tracing::warn!("{}: {}", candidate.name, e);
                SpeedTestResult::failure(&candidate.name, url, timestamp, e.to_string())
            }
        }
    }

    async fn transfer(&self, url: &str) -> Result<Measurement, TransferError> {
        let started = Instant::now();
        let deadline = started + self.duration;

        let mut response = self
            .client
            .get(url)
            .timeout(self.duration + self.grace)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status(status.as_u16()));
        }

        let mut measurement = Measurement::default();
        loop {
            match tokio::time::timeout_at(deadline, response.chunk()).await {
                Ok(Ok(Some(chunk))) => {
                    measurement.record(chunk.len(), started.elapsed());
                    tracing::trace!("{} bytes after {:?}", measurement.bytes, measurement.elapsed);
                    self.report(&measurement);
                    if measurement.elapsed >= self.duration {
                        break;
                    }
                }
                Ok(Ok(None)) => {
                    tracing::debug!("{} finished before the test window closed", url);
                    break;
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => break,
            }
        }
        // dropping `response` here aborts the rest of the download

        if measurement.bytes == 0 {
            return Err(TransferError::NoData(self.duration));
        }

        measurement.elapsed = started.elapsed();
        self.report(&measurement);
        Ok(measurement)
    }

    fn report(&self, measurement: &Measurement) {
        if let Some(progress) = &self.progress {
            progress(measurement);
        }
    }
}
