//! First foul committed after half time.

use super::table::{Cell, Extraction, TableRow};
use super::MatchInput;
use crate::model::{Event, EventKind, Timestamp};
use crate::utils::config::PipelineConfig;
use crate::utils::error::ExtractorError;

const SECOND_HALF: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FirstFoul {
    pub event_id: String,
    pub player_id: Option<u64>,
    pub player_name: String,
    pub team_name: String,
    pub minute: u32,
    pub second: u32,
    pub timestamp: Timestamp,
    pub foul_type: Option<String>,
    pub card: Option<String>,
}

impl TableRow for FirstFoul {
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "player_id",
        "player_name",
        "team_name",
        "minute",
        "second",
        "timestamp",
        "timestamp_seconds",
        "foul_type",
        "card",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.event_id.as_str().into(),
            self.player_id.into(),
            self.player_name.as_str().into(),
            self.team_name.as_str().into(),
            self.minute.into(),
            self.second.into(),
            self.timestamp.to_string().into(),
            self.timestamp.as_seconds().into(),
            self.foul_type.clone().into(),
            self.card.clone().into(),
        ]
    }
}

/// Earliest Foul Committed in period 2 by (minute, second)
///
/// Timestamp and feed index break ties inside the same second.
pub fn find_first_foul(events: &[Event]) -> Option<FirstFoul> {
    let event = events
        .iter()
        .filter(|e| e.period == SECOND_HALF && matches!(e.kind, EventKind::FoulCommitted(_)))
        .min_by_key(|e| (e.minute, e.second, e.timestamp, e.index))?;

    let (foul_type, card) = match &event.kind {
        EventKind::FoulCommitted(foul) => (foul.foul_type.clone(), foul.card.clone()),
        _ => (None, None),
    };

    Some(FirstFoul {
        event_id: event.id.clone(),
        player_id: event.player_id(),
        player_name: event.player_name().to_string(),
        team_name: event.team_name().to_string(),
        minute: event.minute,
        second: event.second,
        timestamp: event.timestamp,
        foul_type,
        card,
    })
}

/// Extractor: first foul committed in the second half, undefined if none
pub fn first_foul_in_second_half(
    input: &MatchInput<'_>,
    _config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(match find_first_foul(input.events) {
        Some(foul) => Extraction::table(&[foul]),
        None => Extraction::undefined("no foul committed in the second half"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventType, FoulDetail};

    fn foul(id: &str, period: u8, minute: u32, second: u32) -> Event {
        Event {
            id: id.to_string(),
            index: 0,
            period,
            timestamp: Timestamp::ZERO,
            minute,
            second,
            team: None,
            player: None,
            location: None,
            kind: EventKind::FoulCommitted(FoulDetail::default()),
        }
    }

    #[test]
    fn test_picks_smallest_clock_in_period_two() {
        let events = vec![
            foul("first-half", 1, 30, 0),
            foul("b", 2, 50, 10),
            foul("a", 2, 47, 59),
            foul("c", 2, 47, 59),
        ];

        let first = find_first_foul(&events).unwrap();
        assert_eq!(first.event_id, "a");
    }

    #[test]
    fn test_no_second_half_foul_is_undefined() {
        let mut carry = foul("x", 2, 46, 0);
        carry.kind = EventKind::Other(EventType::Carry);
        let events = vec![foul("first-half", 1, 30, 0), carry];

        let input = MatchInput {
            events: &events,
            lineups: &[],
        };
        let extraction = first_foul_in_second_half(&input, &PipelineConfig::default()).unwrap();
        assert!(matches!(extraction.value, crate::metrics::MetricValue::Undefined(_)));
    }
}
