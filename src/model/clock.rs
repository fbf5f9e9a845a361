//! Elapsed match time derived from the event stream.
//!
//! Event timestamps restart at every period. `MatchClock` measures how long
//! each period actually lasted and maps (period, timestamp) pairs onto one
//! continuous timeline, so a second-half event always sorts after every
//! first-half event and nothing on the timeline exceeds the total duration.

use super::event::{Event, EventType, Timestamp};
use super::lineup::ClockMark;
use std::collections::BTreeMap;

/// Observed extent of one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSpan {
    pub period: u8,
    pub start: Timestamp,
    pub end: Timestamp,

    /// End came from a Half End marker rather than the last event
    pub explicit_end: bool,
}

impl PeriodSpan {
    pub fn duration_ms(&self) -> u64 {
        self.end.as_millis().saturating_sub(self.start.as_millis())
    }
}

#[derive(Debug, Default)]
struct SpanBuilder {
    half_start: Option<Timestamp>,
    half_end: Option<Timestamp>,
    last: Timestamp,
}

/// Continuous timeline over all periods of a match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchClock {
    spans: Vec<PeriodSpan>,
}

impl MatchClock {
    /// Measure period spans from an event sequence
    ///
    /// A period starts at its Half Start marker (or 0) and ends at its latest
    /// Half End marker, falling back to its last event.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Self {
        let mut builders: BTreeMap<u8, SpanBuilder> = BTreeMap::new();

        for event in events {
            let builder = builders.entry(event.period).or_default();
            builder.last = builder.last.max(event.timestamp);

            match event.event_type() {
                EventType::HalfStart => {
                    builder.half_start = Some(
                        builder
                            .half_start
                            .map_or(event.timestamp, |t| t.min(event.timestamp)),
                    );
                }
                EventType::HalfEnd => {
                    builder.half_end = Some(
                        builder
                            .half_end
                            .map_or(event.timestamp, |t| t.max(event.timestamp)),
                    );
                }
                _ => {}
            }
        }

        let spans = builders
            .into_iter()
            .map(|(period, b)| {
                let start = b.half_start.unwrap_or(Timestamp::ZERO);
                let end = b.half_end.unwrap_or(b.last).max(start);
                PeriodSpan {
                    period,
                    start,
                    end,
                    explicit_end: b.half_end.is_some(),
                }
            })
            .collect();

        Self { spans }
    }

    pub fn spans(&self) -> &[PeriodSpan] {
        &self.spans
    }

    pub fn span(&self, period: u8) -> Option<&PeriodSpan> {
        self.spans.iter().find(|s| s.period == period)
    }

    /// Total match duration in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.spans.iter().map(PeriodSpan::duration_ms).sum()
    }

    /// Time played in all periods before this one
    pub fn period_offset_ms(&self, period: u8) -> u64 {
        self.spans
            .iter()
            .filter(|s| s.period < period)
            .map(PeriodSpan::duration_ms)
            .sum()
    }

    /// Position of a period timestamp on the match timeline
    pub fn elapsed_ms(&self, period: u8, timestamp: Timestamp) -> u64 {
        let offset = self.period_offset_ms(period);
        match self.span(period) {
            Some(span) => {
                let into = timestamp.as_millis().saturating_sub(span.start.as_millis());
                offset + into.min(span.duration_ms())
            }
            None => offset,
        }
    }

    /// Position of a match-clock mark on the match timeline
    pub fn elapsed_at(&self, mark: ClockMark) -> u64 {
        let offset = self.period_offset_ms(mark.period);
        match self.span(mark.period) {
            Some(span) => offset + mark.millis_into_period().min(span.duration_ms()),
            None => offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::EventKind;

    fn marker(id: &str, period: u8, millis: u64, event_type: EventType) -> Event {
        Event {
            id: id.to_string(),
            index: 0,
            period,
            timestamp: Timestamp::from_millis(millis),
            minute: 0,
            second: 0,
            team: None,
            player: None,
            location: None,
            kind: EventKind::Other(event_type),
        }
    }

    #[test]
    fn test_spans_use_half_end_markers() {
        let events = vec![
            marker("a", 1, 0, EventType::HalfStart),
            marker("b", 1, 1_000_000, EventType::Pass),
            marker("c", 1, 2_820_000, EventType::HalfEnd),
            marker("d", 2, 0, EventType::HalfStart),
            marker("e", 2, 2_900_000, EventType::Carry),
        ];

        let clock = MatchClock::from_events(&events);
        assert_eq!(clock.spans().len(), 2);
        assert!(clock.span(1).unwrap().explicit_end);
        assert!(!clock.span(2).unwrap().explicit_end);
        assert_eq!(clock.total_ms(), 2_820_000 + 2_900_000);
    }

    #[test]
    fn test_elapsed_is_continuous_across_periods() {
        let events = vec![
            marker("a", 1, 2_700_000, EventType::HalfEnd),
            marker("b", 2, 2_700_000, EventType::HalfEnd),
        ];
        let clock = MatchClock::from_events(&events);

        assert_eq!(clock.elapsed_ms(2, Timestamp::from_millis(60_000)), 2_760_000);
        // clamped to the period end
        assert_eq!(clock.elapsed_ms(1, Timestamp::from_millis(9_999_999)), 2_700_000);
        assert_eq!(clock.elapsed_at(ClockMark::new(2, 60, 0)), 2_700_000 + 900_000);
        assert_eq!(clock.elapsed_at(ClockMark::new(3, 91, 0)), clock.total_ms());
    }
}
