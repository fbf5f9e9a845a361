//! Time-based metrics: match duration and player time on pitch.
//!
//! Both read the same continuous timeline (`MatchClock`), so a player's
//! time on pitch can never exceed the match duration.

use super::table::{round_to, Cell, Extraction, TableRow};
use super::MatchInput;
use crate::model::{Event, EventKind, LineupEntry, MatchClock};
use crate::utils::config::PipelineConfig;
use crate::utils::error::ExtractorError;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Match duration summary row
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDuration {
    pub num_periods: usize,
    pub total_ms: u64,
}

impl TableRow for MatchDuration {
    const COLUMNS: &'static [&'static str] = &[
        "num_periods",
        "total_match_duration_seconds",
        "total_match_duration_milliseconds",
        "total_match_duration_minutes",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.num_periods.into(),
            round_to(self.total_ms as f64 / 1000.0, 3).into(),
            self.total_ms.into(),
            round_to(self.total_ms as f64 / 60_000.0, 2).into(),
        ]
    }
}

/// Compute match duration from the period spans
pub fn compute_match_duration(events: &[Event]) -> MatchDuration {
    let clock = MatchClock::from_events(events);

    for span in clock.spans() {
        debug!(
            "Period {}: {} -> {} ({} ms{})",
            span.period,
            span.start,
            span.end,
            span.duration_ms(),
            if span.explicit_end { "" } else { ", no Half End marker" }
        );
    }

    MatchDuration {
        num_periods: clock.spans().len(),
        total_ms: clock.total_ms(),
    }
}

/// Extractor: total match duration
pub fn match_duration(
    input: &MatchInput<'_>,
    _config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(Extraction::table(&[compute_match_duration(input.events)]))
}

/// Time one player spent on the pitch
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTime {
    pub team_id: u64,
    pub team_name: String,
    pub player_id: u64,
    pub player_name: String,
    pub millis_on_pitch: u64,
}

impl PlayerTime {
    pub fn seconds(&self) -> f64 {
        self.millis_on_pitch as f64 / 1000.0
    }

    pub fn minutes(&self) -> f64 {
        self.millis_on_pitch as f64 / 60_000.0
    }
}

impl TableRow for PlayerTime {
    const COLUMNS: &'static [&'static str] = &[
        "team_id",
        "team_name",
        "player_id",
        "player_name",
        "seconds_on_pitch",
        "minutes_on_pitch",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.team_id.into(),
            self.team_name.as_str().into(),
            self.player_id.into(),
            self.player_name.as_str().into(),
            round_to(self.seconds(), 2).into(),
            round_to(self.minutes(), 2).into(),
        ]
    }
}

/// Appearance markers found in the event stream, as elapsed milliseconds
#[derive(Debug, Default)]
struct EventMarkers {
    on: HashMap<u64, u64>,
    off: HashMap<u64, u64>,
    sent_off: HashMap<u64, u64>,
}

fn keep_earliest(map: &mut HashMap<u64, u64>, player_id: u64, at: u64) {
    map.entry(player_id)
        .and_modify(|existing| *existing = (*existing).min(at))
        .or_insert(at);
}

fn event_markers(events: &[Event], clock: &MatchClock) -> EventMarkers {
    let mut markers = EventMarkers::default();

    for event in events {
        let at = clock.elapsed_ms(event.period, event.timestamp);

        if let EventKind::Substitution(sub) = &event.kind {
            if let Some(off) = event.player_id() {
                keep_earliest(&mut markers.off, off, at);
            }
            keep_earliest(&mut markers.on, sub.replacement.id, at);
        }

        if event.card().map_or(false, crate::model::is_sending_off) {
            if let Some(player) = event.player_id() {
                keep_earliest(&mut markers.sent_off, player, at);
            }
        }
    }

    markers
}

/// Players referenced by events but absent from the lineup
fn missing_lineup_references(events: &[Event], lineups: &[LineupEntry]) -> Vec<String> {
    let known: HashSet<u64> = lineups.iter().map(|e| e.player_id).collect();
    let mut missing: BTreeMap<u64, String> = BTreeMap::new();

    for event in events {
        if let Some(player) = &event.player {
            if !known.contains(&player.id) {
                missing
                    .entry(player.id)
                    .or_insert_with(|| event.player_name().to_string());
            }
        }
        if let EventKind::Substitution(sub) = &event.kind {
            if !known.contains(&sub.replacement.id) {
                missing.entry(sub.replacement.id).or_insert_with(|| {
                    sub.replacement.name.clone().unwrap_or_else(|| "Unknown".to_string())
                });
            }
        }
    }

    missing
        .into_iter()
        .map(|(id, name)| {
            format!(
                "player {} ({}) appears in events but not in the lineup; excluded from time on pitch",
                id, name
            )
        })
        .collect()
}

/// Compute time on pitch for every player who appeared
///
/// start = kickoff for starters, otherwise the earliest substitution-on
/// marker (lineup or event). end = earliest of substitution-off, sending
/// off and match end. Players who never appeared are omitted.
pub fn compute_player_times(events: &[Event], lineups: &[LineupEntry]) -> Vec<PlayerTime> {
    let clock = MatchClock::from_events(events);
    let match_end = clock.total_ms();
    let markers = event_markers(events, &clock);

    lineups
        .iter()
        .filter_map(|entry| {
            let start = if entry.starter {
                Some(0)
            } else {
                [
                    entry.on.map(|mark| clock.elapsed_at(mark)),
                    markers.on.get(&entry.player_id).copied(),
                ]
                .into_iter()
                .flatten()
                .min()
            }?;

            let end = [
                entry.off.map(|mark| clock.elapsed_at(mark)),
                entry.sent_off.map(|mark| clock.elapsed_at(mark)),
                markers.off.get(&entry.player_id).copied(),
                markers.sent_off.get(&entry.player_id).copied(),
                Some(match_end),
            ]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(match_end);

            Some(PlayerTime {
                team_id: entry.team_id,
                team_name: entry.team_name.clone(),
                player_id: entry.player_id,
                player_name: entry.player_name.clone(),
                millis_on_pitch: end.saturating_sub(start),
            })
        })
        .collect()
}

/// Extractor: seconds and minutes each player spent on the pitch
pub fn player_time_on_pitch(
    input: &MatchInput<'_>,
    _config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }
    if input.lineups.is_empty() {
        return Err(ExtractorError::MissingLineups);
    }

    let warnings = missing_lineup_references(input.events, input.lineups);
    for warning in &warnings {
        warn!("{}", warning);
    }

    let rows = compute_player_times(input.events, input.lineups);
    Ok(Extraction::table(&rows).with_warnings(warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClockMark, EventType, PlayerRef, SubstitutionDetail, Timestamp};

    fn event(id: &str, period: u8, secs: u64, kind: EventKind, player: Option<u64>) -> Event {
        Event {
            id: id.to_string(),
            index: 0,
            period,
            timestamp: Timestamp::from_millis(secs * 1000),
            minute: 0,
            second: 0,
            team: None,
            player: player.map(|id| PlayerRef { id, name: None }),
            location: None,
            kind,
        }
    }

    fn entry(player_id: u64, starter: bool) -> LineupEntry {
        LineupEntry {
            team_id: 1,
            team_name: "Home".to_string(),
            player_id,
            player_name: format!("Player {}", player_id),
            position: None,
            shirt_number: None,
            starter,
            on: None,
            off: None,
            sent_off: None,
        }
    }

    /// Two 45-minute halves with explicit end markers
    fn full_match() -> Vec<Event> {
        vec![
            event("h1s", 1, 0, EventKind::Other(EventType::HalfStart), None),
            event("h1e", 1, 2700, EventKind::Other(EventType::HalfEnd), None),
            event("h2s", 2, 0, EventKind::Other(EventType::HalfStart), None),
            event("h2e", 2, 2700, EventKind::Other(EventType::HalfEnd), None),
        ]
    }

    #[test]
    fn test_match_duration_sums_periods() {
        let duration = compute_match_duration(&full_match());
        assert_eq!(duration.num_periods, 2);
        assert_eq!(duration.total_ms, 5_400_000);
    }

    #[test]
    fn test_match_duration_without_end_marker_uses_last_event() {
        let events = vec![
            event("a", 1, 0, EventKind::Other(EventType::HalfStart), None),
            event("b", 1, 1234, EventKind::Other(EventType::Carry), None),
        ];
        assert_eq!(compute_match_duration(&events).total_ms, 1_234_000);
    }

    #[test]
    fn test_starter_plays_full_match() {
        let times = compute_player_times(&full_match(), &[entry(1, true)]);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].minutes(), 90.0);
    }

    #[test]
    fn test_lineup_substitution_markers() {
        let mut off = entry(1, true);
        off.off = Some(ClockMark::new(2, 60, 0));
        let mut on = entry(2, false);
        on.on = Some(ClockMark::new(2, 60, 0));
        let bench = entry(3, false);

        let times = compute_player_times(&full_match(), &[off, on, bench]);

        assert_eq!(times.len(), 2);
        assert_eq!(times[0].minutes(), 60.0);
        assert_eq!(times[1].minutes(), 30.0);
    }

    #[test]
    fn test_substitution_event_and_red_card() {
        let mut events = full_match();
        events.push(event(
            "sub",
            2,
            600,
            EventKind::Substitution(SubstitutionDetail {
                replacement: PlayerRef { id: 2, name: None },
                outcome: None,
            }),
            Some(1),
        ));
        events.push(event(
            "red",
            2,
            1500,
            EventKind::BadBehaviour(crate::model::CardDetail {
                card: Some("Red Card".to_string()),
            }),
            Some(2),
        ));

        let times = compute_player_times(&events, &[entry(1, true), entry(2, false)]);

        assert_eq!(times[0].minutes(), 55.0);
        assert_eq!(times[1].minutes(), 15.0);
    }

    #[test]
    fn test_time_never_exceeds_duration() {
        let mut late = entry(1, true);
        late.sent_off = Some(ClockMark::new(2, 130, 0));

        let times = compute_player_times(&full_match(), &[late]);
        assert_eq!(times[0].millis_on_pitch, 5_400_000);
    }

    #[test]
    fn test_missing_lineup_reference_warns() {
        let mut events = full_match();
        events.push(event("p", 1, 10, EventKind::Other(EventType::Carry), Some(99)));

        let input = MatchInput {
            events: &events,
            lineups: &[entry(1, true)],
        };
        let extraction = player_time_on_pitch(&input, &PipelineConfig::default()).unwrap();

        assert_eq!(extraction.warnings.len(), 1);
        assert!(extraction.warnings[0].contains("99"));
    }

    #[test]
    fn test_requires_lineups() {
        let events = full_match();
        let input = MatchInput {
            events: &events,
            lineups: &[],
        };
        assert_eq!(
            player_time_on_pitch(&input, &PipelineConfig::default()),
            Err(ExtractorError::MissingLineups)
        );
    }
}
