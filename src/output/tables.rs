//! CSV writer for metric tables.
//!
//! One file per metric, named `<section>_<metric_name>.csv`. Files are
//! truncated on every run so reruns overwrite rather than append.

use crate::metrics::{MetricResult, MetricTable};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Path a metric is written to
pub fn table_path(output_dir: impl AsRef<Path>, result: &MetricResult) -> PathBuf {
    output_dir
        .as_ref()
        .join(format!("{}.csv", result.file_stem()))
}

/// Write every computed metric to its CSV file
///
/// **Public** - final pipeline stage
///
/// Undefined and failed metrics write nothing and remove any file left by
/// an earlier run, so a stale table is never mistaken for a fresh one.
///
/// # Returns
/// Paths of the files written, in result order
pub fn write_results(
    results: &[MetricResult],
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, OutputError> {
    let output_dir = output_dir.as_ref();

    if output_dir.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }
    if output_dir.is_file() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a file: {}",
            output_dir.display()
        )));
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        OutputError::InvalidPath(format!(
            "Cannot create directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let mut written = Vec::new();
    for result in results {
        let path = table_path(output_dir, result);

        match result.table() {
            Some(table) => {
                write_table(table, &path)?;
                debug!("Wrote {} rows to {}", table.len(), path.display());
                written.push(path);
            }
            None => {
                if path.exists() {
                    debug!("Removing stale output {}", path.display());
                    fs::remove_file(&path)?;
                }
            }
        }
    }

    info!(
        "Wrote {} metric tables to {}",
        written.len(),
        output_dir.display()
    );

    Ok(written)
}

/// Write one table, header first, replacing any existing file
pub fn write_table(table: &MetricTable, path: &Path) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}
