//! Shot geometry and shot timing.

use super::table::{round_to, Cell, Extraction, TableRow};
use super::MatchInput;
use crate::model::{Event, EventKind, Location, MatchClock};
use crate::utils::config::{PipelineConfig, PitchConfig};
use crate::utils::error::ExtractorError;

/// Shots in order of occurrence
fn shots_in_order(events: &[Event]) -> Vec<&Event> {
    let mut shots: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Shot(_)))
        .collect();
    shots.sort_by_key(|e| e.occurrence_key());
    shots
}

fn shot_outcome(event: &Event) -> Option<&str> {
    match &event.kind {
        EventKind::Shot(shot) => Some(shot.outcome.as_str()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FurthestShot {
    pub event_id: String,
    pub player_id: Option<u64>,
    pub player_name: String,
    pub team_name: String,
    pub period: u8,
    pub minute: u32,
    pub second: u32,
    pub location: Location,
    pub distance: f64,
    pub outcome: String,
}

impl TableRow for FurthestShot {
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "player_id",
        "player_name",
        "team_name",
        "period",
        "minute",
        "second",
        "location_x",
        "location_y",
        "distance_to_goal",
        "outcome",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.event_id.as_str().into(),
            self.player_id.into(),
            self.player_name.as_str().into(),
            self.team_name.as_str().into(),
            self.period.into(),
            self.minute.into(),
            self.second.into(),
            self.location.x.into(),
            self.location.y.into(),
            round_to(self.distance, 2).into(),
            self.outcome.as_str().into(),
        ]
    }
}

/// Shot with the strictly greatest distance to the goal its team attacks
///
/// Only a strictly greater distance replaces the current best, so the
/// earliest shot wins a tie. Shots without a location are skipped.
pub fn find_furthest_shot(events: &[Event], pitch: &PitchConfig) -> Option<FurthestShot> {
    let mut best: Option<(&Event, Location, f64)> = None;

    for shot in shots_in_order(events) {
        let Some(location) = shot.location else {
            continue;
        };
        let distance = pitch.distance_to_goal(location, shot.team_id());

        if best.map_or(true, |(_, _, current)| distance > current) {
            best = Some((shot, location, distance));
        }
    }

    best.map(|(event, location, distance)| FurthestShot {
        event_id: event.id.clone(),
        player_id: event.player_id(),
        player_name: event.player_name().to_string(),
        team_name: event.team_name().to_string(),
        period: event.period,
        minute: event.minute,
        second: event.second,
        location,
        distance,
        outcome: shot_outcome(event).unwrap_or_default().to_string(),
    })
}

/// Extractor: the shot taken furthest from goal
pub fn furthest_shot_from_goal(
    input: &MatchInput<'_>,
    config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    let shots = shots_in_order(input.events);
    let Some(first) = shots.first() else {
        return Ok(Extraction::undefined("no shots in the match"));
    };

    match find_furthest_shot(input.events, &config.pitch) {
        Some(row) => {
            let unlocated = shots.iter().filter(|s| s.location.is_none()).count();
            let warnings = if unlocated > 0 {
                vec![format!("{} shots without a location were skipped", unlocated)]
            } else {
                Vec::new()
            };
            Ok(Extraction::table(&[row]).with_warnings(warnings))
        }
        None => Err(ExtractorError::MissingField {
            event_id: first.id.clone(),
            field: "location",
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShotGap {
    pub from_event_id: String,
    pub from_period: u8,
    pub from_minute: u32,
    pub from_second: u32,
    pub to_event_id: String,
    pub to_period: u8,
    pub to_minute: u32,
    pub to_second: u32,
    pub gap_ms: u64,
}

impl TableRow for ShotGap {
    const COLUMNS: &'static [&'static str] = &[
        "from_event_id",
        "from_period",
        "from_minute",
        "from_second",
        "to_event_id",
        "to_period",
        "to_minute",
        "to_second",
        "gap_seconds",
        "gap_minutes",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.from_event_id.as_str().into(),
            self.from_period.into(),
            self.from_minute.into(),
            self.from_second.into(),
            self.to_event_id.as_str().into(),
            self.to_period.into(),
            self.to_minute.into(),
            self.to_second.into(),
            round_to(self.gap_ms as f64 / 1000.0, 3).into(),
            round_to(self.gap_ms as f64 / 60_000.0, 2).into(),
        ]
    }
}

/// Longest stretch of match time between consecutive shots
///
/// Gaps are measured on the continuous match clock, so the half-time break
/// is not counted. The earliest pair wins a tie. None with fewer than two
/// shots.
pub fn find_longest_gap(events: &[Event]) -> Option<ShotGap> {
    let clock = MatchClock::from_events(events);
    let shots = shots_in_order(events);

    let mut best: Option<(&Event, &Event, u64)> = None;
    for pair in shots.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let gap = clock
            .elapsed_ms(to.period, to.timestamp)
            .saturating_sub(clock.elapsed_ms(from.period, from.timestamp));

        if best.map_or(true, |(_, _, current)| gap > current) {
            best = Some((from, to, gap));
        }
    }

    best.map(|(from, to, gap_ms)| ShotGap {
        from_event_id: from.id.clone(),
        from_period: from.period,
        from_minute: from.minute,
        from_second: from.second,
        to_event_id: to.id.clone(),
        to_period: to.period,
        to_minute: to.minute,
        to_second: to.second,
        gap_ms,
    })
}

/// Extractor: longest gap between shots, undefined below two shots
pub fn longest_shot_gap(
    input: &MatchInput<'_>,
    _config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(match find_longest_gap(input.events) {
        Some(gap) => Extraction::table(&[gap]),
        None => Extraction::undefined("fewer than two shots in the match"),
    })
}
