//! Validation outcomes and the aggregate report.

use crate::model::Event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a record was rejected
///
/// Declaration order is the check priority: presence, then type, then
/// structure. When several rules fail, the earliest variant is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingField,
    TypeMismatch,
    UnrecognizedType,
    StructureInvalid,
}

impl RejectReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::MissingField => "missing_field",
            RejectReason::TypeMismatch => "type_mismatch",
            RejectReason::UnrecognizedType => "unrecognized_type",
            RejectReason::StructureInvalid => "structure_invalid",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a retained record was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    NegativeIndex,
}

impl WarningReason {
    pub fn code(self) -> &'static str {
        match self {
            WarningReason::NegativeIndex => "negative_index",
        }
    }
}

/// A single failed rule
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub reason: RejectReason,
    pub detail: String,
}

impl Issue {
    pub fn new(reason: RejectReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

/// Outcome label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accepted,
    Warned,
    Rejected,
}

/// Validation verdict; only non-rejected records carry a typed event
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(Event),
    Warned(Event, WarningReason),
    Rejected(Issue),
}

/// A raw record annotated with its validation verdict
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    /// Position in the input file
    pub position: usize,

    /// Identifier as found in the raw record, if readable
    pub id: Option<String>,

    /// Sequence index as found in the raw record, if readable
    pub index: Option<i64>,

    pub verdict: Verdict,
}

impl ValidatedEvent {
    pub fn event(&self) -> Option<&Event> {
        match &self.verdict {
            Verdict::Accepted(event) | Verdict::Warned(event, _) => Some(event),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn into_event(self) -> Option<Event> {
        match self.verdict {
            Verdict::Accepted(event) | Verdict::Warned(event, _) => Some(event),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.verdict {
            Verdict::Accepted(_) => Outcome::Accepted,
            Verdict::Warned(..) => Outcome::Warned,
            Verdict::Rejected(_) => Outcome::Rejected,
        }
    }

    /// Reason code for warned and rejected records
    pub fn reason_code(&self) -> Option<&'static str> {
        match &self.verdict {
            Verdict::Accepted(_) => None,
            Verdict::Warned(_, warning) => Some(warning.code()),
            Verdict::Rejected(issue) => Some(issue.reason.code()),
        }
    }
}

/// One warned or rejected record, as listed in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordNote {
    pub position: usize,
    pub event_id: Option<String>,
    pub index: Option<i64>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

/// Aggregate counts for one validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total: usize,
    pub accepted: usize,
    pub warned: usize,
    pub rejected: usize,

    /// Count per reason code (warnings and rejections)
    pub by_reason: BTreeMap<String, usize>,

    pub rejections: Vec<RecordNote>,
    pub warnings: Vec<RecordNote>,

    /// Count per event type name over retained records
    pub event_types: BTreeMap<String, usize>,
}

impl ValidationReport {
    pub(crate) fn record(&mut self, validated: &ValidatedEvent) {
        self.total += 1;

        match &validated.verdict {
            Verdict::Accepted(event) => {
                self.accepted += 1;
                *self.event_types.entry(event.type_name().to_string()).or_insert(0) += 1;
            }
            Verdict::Warned(event, warning) => {
                self.warned += 1;
                *self.event_types.entry(event.type_name().to_string()).or_insert(0) += 1;
                *self.by_reason.entry(warning.code().to_string()).or_insert(0) += 1;
                self.warnings.push(RecordNote {
                    position: validated.position,
                    event_id: validated.id.clone(),
                    index: validated.index,
                    reason: warning.code().to_string(),
                    detail: String::new(),
                });
            }
            Verdict::Rejected(issue) => {
                self.rejected += 1;
                *self.by_reason.entry(issue.reason.code().to_string()).or_insert(0) += 1;
                self.rejections.push(RecordNote {
                    position: validated.position,
                    event_id: validated.id.clone(),
                    index: validated.index,
                    reason: issue.reason.code().to_string(),
                    detail: issue.detail.clone(),
                });
            }
        }
    }

    pub fn count_for(&self, reason: &str) -> usize {
        self.by_reason.get(reason).copied().unwrap_or(0)
    }

    /// Most frequent event types, highest first
    pub fn top_event_types(&self, n: usize) -> Vec<(&str, usize)> {
        let mut types: Vec<(&str, usize)> = self
            .event_types
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        types.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        types.truncate(n);
        types
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {} | Accepted: {} | Warned: {} | Rejected: {}",
            self.total, self.accepted, self.warned, self.rejected
        )
    }
}
