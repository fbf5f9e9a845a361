//! Schema validation for raw event records.
//!
//! Each record is classified as accepted, warned or rejected. Rejected
//! records keep only their identifier and reason; accepted and warned
//! records are decoded into typed events for the rest of the pipeline.

pub mod report;
pub mod rules;

// Re-export main types
pub use report::{
    Issue, Outcome, RecordNote, RejectReason, ValidatedEvent, ValidationReport, Verdict,
    WarningReason,
};
pub use rules::check_record;

use crate::model::{Event, RawEvent};
use crate::utils::config::ValidationRules;
use log::{debug, info, warn};
use serde_json::Value;

/// Validate a match's raw events
///
/// **Public** - first pipeline stage after loading
///
/// Every record gets a verdict; nothing here fails the run. The report
/// counts outcomes per reason and lists every warned and rejected record.
pub fn validate(
    raw_events: &[RawEvent],
    rules: &ValidationRules,
) -> (Vec<ValidatedEvent>, ValidationReport) {
    debug!("Validating {} raw events", raw_events.len());

    let mut report = ValidationReport::default();
    let validated: Vec<ValidatedEvent> = raw_events
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            let validated = validate_event(position, raw, rules);
            report.record(&validated);
            validated
        })
        .collect();

    info!("Validation: {}", report.summary());

    (validated, report)
}

/// Validate one raw record
pub fn validate_event(position: usize, raw: &RawEvent, rules: &ValidationRules) -> ValidatedEvent {
    let value = raw.value();
    let id = value.get("id").and_then(Value::as_str).map(str::to_string);
    let index = value.get("index").and_then(Value::as_i64);

    let issues = check_record(value, rules);

    let verdict = match issues.into_iter().min_by_key(|issue| issue.reason) {
        Some(issue) => {
            debug!(
                "Rejected event {} at position {}: {} ({})",
                id.as_deref().unwrap_or("<no id>"),
                position,
                issue.reason,
                issue.detail
            );
            Verdict::Rejected(issue)
        }
        None => match Event::decode(value) {
            Ok(event) if event.index < 0 => {
                warn!(
                    "Event {} has negative index {}, keeping it",
                    event.id, event.index
                );
                Verdict::Warned(event, WarningReason::NegativeIndex)
            }
            Ok(event) => Verdict::Accepted(event),
            Err(detail) => Verdict::Rejected(Issue::new(RejectReason::StructureInvalid, detail)),
        },
    };

    ValidatedEvent {
        position,
        id,
        index,
        verdict,
    }
}
