//! Check command implementation.
//!
//! Loads a match, validates and deduplicates it, and prints the validation
//! report without computing or writing any metric.

use super::run::{resolve_config, validate_match_source};
use crate::dedup::dedup;
use crate::parser::{load_events, load_lineups, match_files};
use crate::validator::{validate, ValidationReport};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the check command
#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub data_dir: PathBuf,
    pub match_id: String,
    pub config: Option<PathBuf>,

    /// Number of rejected records to list
    pub show_rejections: usize,

    /// Fail when any record is rejected
    pub strict: bool,
}

/// Validate check arguments
///
/// **Public** - can be called before execute_check for early validation
pub fn validate_check_args(args: &CheckArgs) -> Result<()> {
    validate_match_source(&args.data_dir, &args.match_id)
}

/// Execute the check command
///
/// **Public** - main entry point called from main.rs
pub fn execute_check(args: CheckArgs) -> Result<ValidationReport> {
    let config = resolve_config(args.config.as_ref())?;
    let (events_path, lineups_path) = match_files(&args.data_dir, &args.match_id);

    info!("Checking match {} in {}", args.match_id, args.data_dir.display());

    let raw_events = load_events(&events_path)
        .with_context(|| format!("Failed to load events for match {}", args.match_id))?;
    let (_, lineup_report) = load_lineups(&lineups_path)
        .with_context(|| format!("Failed to load lineups for match {}", args.match_id))?;

    let (validated, report) = validate(&raw_events, &config.validation);
    let deduped = dedup(validated);

    println!("Match {}", args.match_id);
    println!("  {}", report.summary());
    println!("  Duplicates: {}", deduped.duplicate_count);
    println!("  Retained:   {}", deduped.events.len());
    println!(
        "  Lineups:    {} teams, {} players, {} skipped",
        lineup_report.teams,
        lineup_report.players,
        lineup_report.skipped.len()
    );

    if !report.by_reason.is_empty() {
        println!("  By reason:");
        for (reason, count) in &report.by_reason {
            println!("    {:<20} {}", reason, count);
        }
    }

    println!("  Top event types:");
    for (name, count) in report.top_event_types(5) {
        println!("    {:<20} {}", name, count);
    }

    for note in report.rejections.iter().take(args.show_rejections) {
        println!(
            "  ✗ #{} {} ({}): {}",
            note.position,
            note.event_id.as_deref().unwrap_or("<no id>"),
            note.reason,
            note.detail
        );
    }

    if args.strict && report.rejected > 0 {
        anyhow::bail!("{} records rejected", report.rejected);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn args_in(dir: &std::path::Path, strict: bool) -> CheckArgs {
        CheckArgs {
            data_dir: dir.to_path_buf(),
            match_id: "3788741".to_string(),
            config: None,
            show_rejections: 5,
            strict,
        }
    }

    fn write_match(dir: &std::path::Path) {
        let kickoff = json!({
            "id": "kickoff", "index": 1, "period": 1, "timestamp": "00:00:00.000",
            "minute": 0, "second": 0, "type": {"name": "Half Start"}
        });
        let no_timestamp = json!({
            "id": "broken", "index": 2, "period": 1, "minute": 45, "second": 0,
            "type": {"name": "Half End"}
        });
        fs::write(
            dir.join("events_3788741.json"),
            format!("{}\n{}\n", kickoff, no_timestamp),
        )
        .unwrap();
        fs::write(
            dir.join("lineups_3788741.json"),
            json!([{"team_id": 1, "team_name": "Home", "lineup": []}]).to_string(),
        )
        .unwrap();
    }

    #[test]
    fn test_check_reports_rejections() {
        let dir = tempfile::tempdir().unwrap();
        write_match(dir.path());

        let report = execute_check(args_in(dir.path(), false)).unwrap();
        assert_eq!(report.rejected, 1);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.count_for("missing_field"), 1);
    }

    #[test]
    fn test_strict_check_fails_on_rejections() {
        let dir = tempfile::tempdir().unwrap();
        write_match(dir.path());

        let err = execute_check(args_in(dir.path(), true)).unwrap_err();
        assert!(err.to_string().contains("1 records rejected"));
    }

    #[test]
    fn test_check_args_reject_path_like_match_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_in(dir.path(), false);
        assert!(validate_check_args(&args).is_ok());

        args.match_id = "../x".to_string();
        assert!(validate_check_args(&args).is_err());

        args.match_id = "3788741".to_string();
        args.data_dir = dir.path().join("missing");
        assert!(validate_check_args(&args).is_err());
    }
}
