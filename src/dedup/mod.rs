//! Duplicate event removal.
//!
//! Feeds may reissue an identical event payload. The first sighting of an
//! identifier wins and later repeats are dropped; retained events keep their
//! original relative order.

use crate::model::Event;
use crate::validator::ValidatedEvent;
use log::{debug, info};
use std::collections::HashSet;

/// Result of deduplication
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    /// Accepted and warned events, first occurrence of each identifier
    pub events: Vec<ValidatedEvent>,

    /// Number of repeats dropped
    pub duplicate_count: usize,
}

impl DedupOutcome {
    /// Typed events in retained order
    pub fn event_refs(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter_map(ValidatedEvent::event)
    }

    /// Consume into the canonical event sequence for metric extraction
    pub fn into_events(self) -> Vec<Event> {
        self.events
            .into_iter()
            .filter_map(ValidatedEvent::into_event)
            .collect()
    }
}

/// Remove repeated events by identifier
///
/// **Public** - second pipeline stage
///
/// Rejected records are dropped without counting as duplicates. This is a
/// stable filter: applying it to its own output changes nothing and reports
/// zero duplicates.
pub fn dedup(validated: Vec<ValidatedEvent>) -> DedupOutcome {
    let mut seen: HashSet<String> = HashSet::with_capacity(validated.len());
    let mut events = Vec::with_capacity(validated.len());
    let mut duplicate_count = 0;

    for record in validated {
        let Some(event) = record.event() else {
            continue;
        };

        if seen.insert(event.id.clone()) {
            events.push(record);
        } else {
            debug!(
                "Dropping duplicate of event {} at position {}",
                event.id, record.position
            );
            duplicate_count += 1;
        }
    }

    info!(
        "Deduplication kept {} events, dropped {} duplicates",
        events.len(),
        duplicate_count
    );

    DedupOutcome {
        events,
        duplicate_count,
    }
}
