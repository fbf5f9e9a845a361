//! Sanity checks over computed metric tables.
//!
//! A failed check never blocks output; it is logged and recorded in the run
//! summary. Checks on a metric that produced no table are skipped.

use super::table::{MetricResult, MetricTable};
use log::warn;
use serde::{Deserialize, Serialize};

/// Longest plausible regular match, in seconds
const MAX_AVERAGE_SECONDS_ON_PITCH: f64 = 5400.0;

/// Highest plausible share of a team's passes by a single player
const MAX_PASS_SHARE: f64 = 0.5;

/// Latest plausible goal minute, extra time included
const MAX_GOAL_MINUTE: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub metric: String,
    pub check: String,
    pub passed: bool,
    pub severity: Severity,
    pub description: String,
}

struct Recorder<'a> {
    metric: &'a str,
    results: &'a mut Vec<CheckResult>,
}

impl Recorder<'_> {
    fn record(&mut self, check: &str, severity: Severity, passed: bool, description: String) {
        if !passed {
            warn!("Check {}.{} failed: {}", self.metric, check, description);
        }
        self.results.push(CheckResult {
            metric: self.metric.to_string(),
            check: check.to_string(),
            passed,
            severity,
            description,
        });
    }
}

fn computed<'a>(results: &'a [MetricResult], name: &str) -> Option<&'a MetricTable> {
    results.iter().find(|r| r.name == name).and_then(MetricResult::table)
}

/// Run every check whose metric has a table
///
/// **Public** - called after extraction
pub fn run_checks(results: &[MetricResult]) -> Vec<CheckResult> {
    let mut checks = Vec::new();
    let duration = computed(results, "match_duration")
        .and_then(|t| t.column_f64("total_match_duration_seconds").first().copied());

    if let Some(table) = computed(results, "player_time_on_pitch") {
        let mut r = Recorder { metric: "player_time_on_pitch", results: &mut checks };
        let seconds = table.column_f64("seconds_on_pitch");

        // Always holds: times are built from unsigned milliseconds
        let negative = seconds.iter().filter(|s| **s < 0.0).count();
        r.record(
            "no_negative_time",
            Severity::Error,
            negative == 0,
            format!("{} players with negative time on pitch", negative),
        );

        if !seconds.is_empty() {
            let average = seconds.iter().sum::<f64>() / seconds.len() as f64;
            r.record(
                "reasonable_average_time",
                Severity::Warn,
                average > 0.0 && average <= MAX_AVERAGE_SECONDS_ON_PITCH,
                format!("average time on pitch is {:.1} s", average),
            );
        }

        if let Some(total) = duration {
            let over = seconds.iter().filter(|s| **s > total).count();
            r.record(
                "within_match_duration",
                Severity::Error,
                over == 0,
                format!("{} players exceed the match duration of {:.1} s", over, total),
            );
        }
    }

    if let Some(total) = duration {
        let mut r = Recorder { metric: "match_duration", results: &mut checks };
        r.record(
            "positive_duration",
            Severity::Error,
            total > 0.0,
            format!("match duration is {:.1} s", total),
        );
    }

    if let Some(table) = computed(results, "total_passes_per_player") {
        let mut r = Recorder { metric: "total_passes_per_player", results: &mut checks };
        let counts = table.column_f64("total_passes");
        let total: f64 = counts.iter().sum();
        let top = counts.iter().copied().fold(0.0, f64::max);
        let share = if total > 0.0 { top / total } else { 0.0 };
        r.record(
            "no_dominant_passer",
            Severity::Warn,
            share <= MAX_PASS_SHARE,
            format!("top passer has {:.0}% of all passes", share * 100.0),
        );
    }

    if let Some(table) = computed(results, "goal_minutes") {
        let mut r = Recorder { metric: "goal_minutes", results: &mut checks };
        let out_of_range = table
            .column_f64("minute")
            .iter()
            .filter(|m| !(0.0..=MAX_GOAL_MINUTE).contains(*m))
            .count();
        r.record(
            "minute_in_range",
            Severity::Error,
            out_of_range == 0,
            format!("{} goals outside minute 0-120", out_of_range),
        );
    }

    if let Some(table) = computed(results, "first_foul_in_second_half") {
        let mut r = Recorder { metric: "first_foul_in_second_half", results: &mut checks };
        // Always holds: parsed timestamps are unsigned
        let negative = table
            .column_f64("timestamp_seconds")
            .iter()
            .filter(|t| **t < 0.0)
            .count();
        r.record(
            "non_negative_timestamp",
            Severity::Error,
            negative == 0,
            format!("{} fouls with a negative timestamp", negative),
        );
    }

    checks
}
