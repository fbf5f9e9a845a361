//! Stage wiring for one match.
//!
//! Every stage is also public on its own; `run_match` only sequences them
//! and keeps the intermediate values the caller may want to inspect.

use crate::dedup::{dedup, DedupOutcome};
use crate::metrics::{run_checks, run_extractors, CheckResult, MatchInput, MetricResult};
use crate::model::{Event, LineupEntry, RawEvent};
use crate::utils::config::PipelineConfig;
use crate::validator::{validate, ValidationReport};
use log::info;

/// Everything one pipeline run produced, before anything is written
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub report: ValidationReport,
    pub duplicate_count: usize,

    /// Canonical event sequence the extractors read
    pub events: Vec<Event>,

    pub results: Vec<MetricResult>,
    pub checks: Vec<CheckResult>,
}

impl MatchRun {
    pub fn result(&self, name: &str) -> Option<&MetricResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Validate, deduplicate and extract metrics for one match
///
/// **Public** - main entry point for the library
///
/// Pure apart from logging: nothing is read from or written to disk.
pub fn run_match(
    raw_events: &[RawEvent],
    lineups: &[LineupEntry],
    config: &PipelineConfig,
) -> MatchRun {
    let (validated, report) = validate(raw_events, &config.validation);

    let deduped: DedupOutcome = dedup(validated);
    let duplicate_count = deduped.duplicate_count;
    let events = deduped.into_events();

    let input = MatchInput {
        events: &events,
        lineups,
    };
    let results = run_extractors(&input, config);
    let checks = run_checks(&results);

    info!(
        "Match run complete: {} events, {} metrics computed, {} checks failed",
        events.len(),
        results.iter().filter(|r| r.table().is_some()).count(),
        checks.iter().filter(|c| !c.passed).count()
    );

    MatchRun {
        report,
        duplicate_count,
        events,
        results,
        checks,
    }
}
