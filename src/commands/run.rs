//! Run command implementation.
//!
//! The run command:
//! 1. Loads the match's event and lineup files
//! 2. Validates, deduplicates and extracts metrics
//! 3. Writes metric tables and the run summary

use crate::metrics::Severity;
use crate::output::{write_results, write_summary, RunSummary};
use crate::parser::{load_events, load_lineups, match_files};
use crate::pipeline::run_match;
use crate::utils::config::{load_config, PipelineConfig, RUN_SUMMARY_FILE};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the run command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Directory holding `events_<id>.json` and `lineups_<id>.json`
    pub data_dir: PathBuf,

    pub match_id: String,

    /// Directory metric tables and the run summary are written to
    pub output_dir: PathBuf,

    /// Optional TOML pipeline configuration
    pub config: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            match_id: String::new(),
            output_dir: PathBuf::from("output"),
            config: None,
            print_summary: false,
        }
    }
}

/// Execute the run command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed input files (no output is written)
/// * Invalid configuration
/// * File write errors
pub fn execute_run(args: RunArgs) -> Result<RunSummary> {
    let start_time = Instant::now();

    info!("Starting run for match: {}", args.match_id);

    let config = resolve_config(args.config.as_ref())?;

    // Step 1: Load inputs
    info!("Step 1/3: Loading match files...");
    let (events_path, lineups_path) = match_files(&args.data_dir, &args.match_id);
    let raw_events = load_events(&events_path)
        .with_context(|| format!("Failed to load events for match {}", args.match_id))?;
    let (lineups, lineup_report) = load_lineups(&lineups_path)
        .with_context(|| format!("Failed to load lineups for match {}", args.match_id))?;

    debug!(
        "Loaded {} raw events and {} lineup entries",
        raw_events.len(),
        lineups.len()
    );

    // Step 2: Validate, deduplicate, extract
    info!("Step 2/3: Running pipeline...");
    let run = run_match(&raw_events, &lineups, &config);

    // Step 3: Write outputs
    info!("Step 3/3: Writing output files...");
    let written = write_results(&run.results, &args.output_dir)
        .context("Failed to write metric tables")?;

    let summary = RunSummary::new(
        args.match_id.clone(),
        run.report,
        lineup_report,
        run.duplicate_count,
        &run.results,
        run.checks,
    );
    let summary_path = args.output_dir.join(RUN_SUMMARY_FILE);
    write_summary(&summary, &summary_path).context("Failed to write run summary")?;

    info!("✓ {} metric tables written to: {}", written.len(), args.output_dir.display());
    info!("✓ Run summary written to: {}", summary_path.display());

    for check in summary.failed_checks() {
        warn!(
            "{} check {}.{}: {}",
            match check.severity {
                Severity::Error => "Error",
                Severity::Warn => "Warn",
            },
            check.metric,
            check.check,
            check.description
        );
    }

    if args.print_summary {
        print_run_summary(&summary);
    }

    let elapsed = start_time.elapsed();
    info!("Run completed in {:.2}s", elapsed.as_secs_f64());

    Ok(summary)
}

/// Load the configuration file if one was given
pub(crate) fn resolve_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Print a run summary as text
///
/// **Public** - shared with the summary command
pub fn print_run_summary(summary: &RunSummary) {
    println!("\n{}", "=".repeat(80));
    println!("RUN SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Match:        {}", summary.match_id);
    println!("Generated:    {}", summary.generated_at);
    println!("Validation:   {}", summary.validation.summary());
    println!("Duplicates:   {}", summary.duplicate_count);
    println!(
        "Lineups:      {} teams, {} players ({} appeared)",
        summary.lineups.teams, summary.lineups.players, summary.lineups.appeared
    );
    println!();
    for metric in &summary.metrics {
        match &metric.reason {
            Some(reason) => println!("  {:<28} {:<10} {}", metric.name, metric.status, reason),
            None => println!("  {:<28} {:<10} {} rows", metric.name, metric.status, metric.rows),
        }
    }
    let failed = summary.failed_checks().count();
    println!();
    println!("Checks:       {} run, {} failed", summary.checks.len(), failed);
    println!("{}", "=".repeat(80));
}

/// Validate run arguments
///
/// **Public** - can be called before execute_run for early validation
pub fn validate_args(args: &RunArgs) -> Result<()> {
    validate_match_source(&args.data_dir, &args.match_id)?;

    if args.output_dir.is_file() {
        anyhow::bail!("Output path is a file: {}", args.output_dir.display());
    }

    Ok(())
}

/// Match id and data directory checks shared by every command that reads a match
pub(crate) fn validate_match_source(data_dir: &Path, match_id: &str) -> Result<()> {
    if match_id.is_empty() {
        anyhow::bail!("Match id cannot be empty");
    }

    if !match_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        anyhow::bail!("Match id may only contain letters, digits, '-' and '_'");
    }

    if !data_dir.is_dir() {
        anyhow::bail!("Data directory not found: {}", data_dir.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_in(dir: &std::path::Path) -> RunArgs {
        RunArgs {
            data_dir: dir.to_path_buf(),
            match_id: "3788741".to_string(),
            output_dir: dir.join("out"),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_args(&args_in(dir.path())).is_ok());
    }

    #[test]
    fn test_validate_args_empty_match_id() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            match_id: String::new(),
            ..args_in(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_path_in_match_id() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            match_id: "../etc".to_string(),
            ..args_in(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            data_dir: dir.path().join("missing"),
            ..args_in(dir.path())
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_malformed_events_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events_3788741.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("lineups_3788741.json"), "[]").unwrap();

        let args = args_in(dir.path());
        assert!(execute_run(args.clone()).is_err());
        assert!(!args.output_dir.exists());
    }
}
