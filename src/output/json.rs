//! JSON run summary writer.
//!
//! Writes the per-run summary (validation counts, lineup report, metric
//! statuses and check outcomes) next to the metric tables.

use crate::metrics::{CheckResult, MetricResult};
use crate::parser::LineupReport;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use crate::validator::ValidationReport;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Status of one metric as recorded in the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: String,
    pub file: String,
    pub status: String,
    pub rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<&MetricResult> for MetricSummary {
    fn from(result: &MetricResult) -> Self {
        Self {
            name: result.name.to_string(),
            file: format!("{}.csv", result.file_stem()),
            status: result.status.label().to_string(),
            rows: result.table().map_or(0, |t| t.len()),
            reason: result.reason().map(str::to_string),
            warnings: result.warnings.clone(),
        }
    }
}

/// Everything a run reports besides the tables themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub version: String,
    pub match_id: String,
    pub generated_at: String,
    pub validation: ValidationReport,
    pub lineups: LineupReport,
    pub duplicate_count: usize,
    pub metrics: Vec<MetricSummary>,
    pub checks: Vec<CheckResult>,
}

impl RunSummary {
    pub fn new(
        match_id: impl Into<String>,
        validation: ValidationReport,
        lineups: LineupReport,
        duplicate_count: usize,
        results: &[MetricResult],
        checks: Vec<CheckResult>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            match_id: match_id.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            validation,
            lineups,
            duplicate_count,
            metrics: results.iter().map(MetricSummary::from).collect(),
            checks,
        }
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Write a run summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(summary: &RunSummary, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing run summary to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!(
        "Run summary written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a run summary back from a JSON file
///
/// **Public** - used by the `summary` command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<RunSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading run summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let summary: RunSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Run summary loaded: version {}, match {}",
        summary.version, summary.match_id
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricStatus, Severity};
    use tempfile::NamedTempFile;

    fn create_test_summary() -> RunSummary {
        let results = vec![MetricResult {
            name: "longest_shot_gap",
            section: "3h",
            status: MetricStatus::Undefined("fewer than two shots in the match".to_string()),
            warnings: Vec::new(),
        }];
        let checks = vec![CheckResult {
            metric: "match_duration".to_string(),
            check: "positive_duration".to_string(),
            passed: true,
            severity: Severity::Error,
            description: "match duration is 5400.0 s".to_string(),
        }];

        RunSummary::new(
            "3788741",
            ValidationReport::default(),
            LineupReport::default(),
            2,
            &results,
            checks,
        )
    }

    #[test]
    fn test_write_and_read_summary() {
        let summary = create_test_summary();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_summary(&summary, path).unwrap();
        let loaded = read_summary(path).unwrap();

        assert_eq!(loaded, summary);
        assert_eq!(loaded.metrics[0].file, "3h_longest_shot_gap.csv");
        assert_eq!(loaded.metrics[0].status, "undefined");
        assert_eq!(loaded.failed_checks().count(), 0);
    }

    #[test]
    fn test_validate_output_path_empty() {
        let result = validate_output_path(Path::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/run_summary.json");

        write_summary(&create_test_summary(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}
