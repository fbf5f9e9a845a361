use super::run::print_run_summary;
use crate::metrics::EXTRACTORS;
use crate::output::read_summary;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Print a run summary JSON file
pub fn show_summary_file(file_path: PathBuf) -> Result<()> {
    println!("Reading run summary: {}", file_path.display());

    let summary = read_summary(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    println!("✓ Valid run summary (schema v{})", summary.version);
    print_run_summary(&summary);

    Ok(())
}

/// Display output table schemas
pub fn display_schema(show_details: bool) {
    println!("Matchday Pipeline Output Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    for extractor in EXTRACTORS {
        println!("  {}_{}.csv", extractor.section, extractor.name);
        if show_details {
            for column in extractor.columns {
                println!("      {}", column);
            }
        }
    }

    if !show_details {
        println!();
        println!("Use --show for column details");
    }
}

/// Display version information
pub fn display_version() {
    println!("Matchday Pipeline v{}", env!("CARGO_PKG_VERSION"));
    println!("Output Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Validates, deduplicates and derives metrics from football match event data.");
}
