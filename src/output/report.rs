//! JSON report file

use crate::speedtest::SpeedTestResult;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of every report file name
pub const REPORT_PREFIX: &str = "snapshot-speed-test-";

/// File name for a report written at `timestamp`
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use snapshot_scout::output::report_file_name;
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
/// assert_eq!(report_file_name(&at), "snapshot-speed-test-2024-05-01T12-30-00-000Z.json");
/// ```
pub fn report_file_name(timestamp: &DateTime<Utc>) -> String {
    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}{}.json", REPORT_PREFIX, stamp)
}

/// Writes results as a pretty-printed JSON array into `directory`
///
/// The directory is created if needed. Returns the path of the new file.
pub fn write_json_report(
    directory: &Path,
    results: &[SpeedTestResult],
    timestamp: &DateTime<Utc>,
) -> crate::Result<PathBuf> {
    fs::create_dir_all(directory)?;
    let path = directory.join(report_file_name(timestamp));
    let json = serde_json::to_string_pretty(results)?;
    fs::write(&path, json)?;
    tracing::info!("Results saved to {}", path.display());
    Ok(path)
}
