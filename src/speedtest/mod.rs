//! Throughput testing of located snapshot URLs
//!
//! Each candidate is downloaded for a fixed window; the transfer is then cut
//! off and the achieved rate recorded. Failures become `error` results, never
//! propagated errors.

mod tester;

pub use tester::{build_transfer_client, ProgressCallback, ThroughputTester, TransferError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BYTES_PER_MIB: f64 = 1_048_576.0;

/// Outcome of a throughput test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Error,
}

/// One throughput test result, as written to the report file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestResult {
    pub name: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_mbps: Option<f64>,
    #[serde(rename = "bytesReceived", skip_serializing_if = "Option::is_none")]
    pub bytes_received: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpeedTestResult {
    pub fn success(
        name: &str,
        url: &str,
        timestamp: DateTime<Utc>,
        measurement: &Measurement,
    ) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            timestamp,
            status: TestStatus::Success,
            speed_mbps: Some(measurement.mbps()),
            bytes_received: Some(measurement.bytes),
            error: None,
        }
    }

    pub fn failure(
        name: &str,
        url: &str,
        timestamp: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            timestamp,
            status: TestStatus::Error,
            speed_mbps: None,
            bytes_received: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TestStatus::Success
    }
}

/// Bytes received so far and the time it took
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurement {
    pub bytes: u64,
    pub elapsed: Duration,
}

impl Measurement {
    /// Adds a delivered chunk
    pub fn record(&mut self, chunk_len: usize, elapsed: Duration) {
        self.bytes += chunk_len as u64;
        self.elapsed = elapsed;
    }

    /// Transfer rate in megabits per second
    pub fn mbps(&self) -> f64 {
        transfer_rate_mbps(self.bytes, self.elapsed)
    }

    pub fn mebibytes(&self) -> f64 {
        self.bytes as f64 / BYTES_PER_MIB
    }
}

/// Megabits per second for `bytes` delivered over `elapsed`; zero for an empty interval
pub fn transfer_rate_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return 0.0;
    }
    (bytes as f64 * 8.0) / 1_000_000.0 / seconds
}

/// Converts a byte count to mebibytes for display
pub fn to_mebibytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}
