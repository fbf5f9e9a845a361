//! Events inside the penalty box the acting team attacks.

use super::table::{Cell, Extraction, TableRow};
use super::MatchInput;
use crate::model::{Event, Location};
use crate::utils::config::{PipelineConfig, PitchConfig};
use crate::utils::error::ExtractorError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxEvent {
    pub event_id: String,
    pub event_type: &'static str,
    pub team_name: String,
    pub player_name: String,
    pub period: u8,
    pub minute: u32,
    pub second: u32,
    pub location: Location,
}

impl TableRow for BoxEvent {
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "event_type",
        "team_name",
        "player_name",
        "period",
        "minute",
        "second",
        "location_x",
        "location_y",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.event_id.as_str().into(),
            self.event_type.into(),
            self.team_name.as_str().into(),
            self.player_name.as_str().into(),
            self.period.into(),
            self.minute.into(),
            self.second.into(),
            self.location.x.into(),
            self.location.y.into(),
        ]
    }
}

/// Located events inside the attacking penalty box, in feed order
pub fn find_box_events(events: &[Event], pitch: &PitchConfig) -> Vec<BoxEvent> {
    events
        .iter()
        .filter_map(|event| {
            let location = event.location?;
            pitch
                .in_penalty_box(location, event.team_id())
                .then(|| BoxEvent {
                    event_id: event.id.clone(),
                    event_type: event.type_name(),
                    team_name: event.team_name().to_string(),
                    player_name: event.player_name().to_string(),
                    period: event.period,
                    minute: event.minute,
                    second: event.second,
                    location,
                })
        })
        .collect()
}

/// Extractor: every event inside the penalty box
pub fn penalty_box_events(
    input: &MatchInput<'_>,
    config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(Extraction::table(&find_box_events(input.events, &config.pitch)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxEventCount {
    pub event_type: &'static str,
    pub count: usize,
}

impl TableRow for BoxEventCount {
    const COLUMNS: &'static [&'static str] = &["event_type", "event_count"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.event_type.into(), self.count.into()]
    }
}

/// Penalty-box events grouped by type, most frequent first
pub fn count_box_events(events: &[Event], pitch: &PitchConfig) -> Vec<BoxEventCount> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for event in find_box_events(events, pitch) {
        *counts.entry(event.event_type).or_default() += 1;
    }

    let mut rows: Vec<BoxEventCount> = counts
        .into_iter()
        .map(|(event_type, count)| BoxEventCount { event_type, count })
        .collect();
    // stable sort keeps name order among equal counts
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Extractor: penalty-box events per event type
pub fn penalty_box_event_counts(
    input: &MatchInput<'_>,
    config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(Extraction::table(&count_box_events(input.events, &config.pitch)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, EventType, Timestamp};

    fn located(id: &str, event_type: EventType, x: f64, y: f64) -> Event {
        Event {
            id: id.to_string(),
            index: 0,
            period: 1,
            timestamp: Timestamp::ZERO,
            minute: 0,
            second: 0,
            team: None,
            player: None,
            location: Some(Location::new(x, y)),
            kind: EventKind::Other(event_type),
        }
    }

    #[test]
    fn test_box_membership() {
        let events = vec![
            located("in", EventType::Carry, 115.0, 40.0),
            located("out", EventType::Carry, 60.0, 40.0),
            located("edge", EventType::Pressure, 102.0, 62.0),
        ];

        let found: Vec<String> = find_box_events(&events, &PitchConfig::default())
            .into_iter()
            .map(|e| e.event_id)
            .collect();
        assert_eq!(found, vec!["in".to_string(), "edge".to_string()]);
    }

    #[test]
    fn test_counts_by_type() {
        let events = vec![
            located("a", EventType::Pressure, 110.0, 30.0),
            located("b", EventType::Carry, 110.0, 30.0),
            located("c", EventType::Carry, 110.0, 30.0),
        ];

        let counts = count_box_events(&events, &PitchConfig::default());
        assert_eq!(counts[0], BoxEventCount { event_type: "Carry", count: 2 });
        assert_eq!(counts[1], BoxEventCount { event_type: "Pressure", count: 1 });
    }
}
