//! Lineup roster entries and match-clock markers.

use crate::utils::config::PERIOD_CLOCK_START_MINUTES;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the cumulative match clock (e.g. 67:30 in period 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClockMark {
    pub period: u8,
    pub minute: u32,
    pub second: u32,
}

impl ClockMark {
    pub fn new(period: u8, minute: u32, second: u32) -> Self {
        Self {
            period,
            minute,
            second,
        }
    }

    /// Parse a `MM:SS` clock string; the period is inferred when not given
    pub fn parse(text: &str, period: Option<u8>) -> Option<Self> {
        let (minute, second) = text.trim().split_once(':')?;
        let minute: u32 = minute.parse().ok()?;
        let second: u32 = second.parse().ok()?;
        let period = period.unwrap_or_else(|| period_for_minute(minute));
        Some(Self::new(period, minute, second))
    }

    /// Milliseconds since the start of this mark's period
    pub fn millis_into_period(&self) -> u64 {
        let clock_ms = (u64::from(self.minute) * 60 + u64::from(self.second)) * 1000;
        clock_ms.saturating_sub(u64::from(period_clock_start(self.period)) * 60_000)
    }
}

impl fmt::Display for ClockMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} {:02}:{:02}", self.period, self.minute, self.second)
    }
}

/// Match-clock minute at which a period starts
pub fn period_clock_start(period: u8) -> u32 {
    let idx = usize::from(period.max(1)) - 1;
    PERIOD_CLOCK_START_MINUTES
        .get(idx)
        .or(PERIOD_CLOCK_START_MINUTES.last())
        .copied()
        .unwrap_or(0)
}

/// Latest period whose clock has started by this minute
fn period_for_minute(minute: u32) -> u8 {
    PERIOD_CLOCK_START_MINUTES
        .iter()
        .rposition(|start| *start <= minute)
        .map(|idx| idx as u8 + 1)
        .unwrap_or(1)
}

/// One player on a team's match roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub team_id: u64,
    pub team_name: String,
    pub player_id: u64,
    pub player_name: String,
    pub position: Option<String>,
    pub shirt_number: Option<u32>,

    /// Started the match in the first eleven
    pub starter: bool,

    /// Came on as a substitute
    pub on: Option<ClockMark>,

    /// Left the pitch before the final whistle
    pub off: Option<ClockMark>,

    /// Red card or second yellow
    pub sent_off: Option<ClockMark>,
}

impl LineupEntry {
    /// Whether the player took the field at all
    pub fn appeared(&self) -> bool {
        self.starter || self.on.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_mark() {
        let mark = ClockMark::parse("67:30", Some(2)).unwrap();
        assert_eq!(mark, ClockMark::new(2, 67, 30));
        assert_eq!(mark.millis_into_period(), (22 * 60 + 30) * 1000);
    }

    #[test]
    fn test_parse_infers_period() {
        assert_eq!(ClockMark::parse("12:00", None).unwrap().period, 1);
        assert_eq!(ClockMark::parse("50:00", None).unwrap().period, 2);
        assert_eq!(ClockMark::parse("95:10", None).unwrap().period, 3);
        assert!(ClockMark::parse("nonsense", None).is_none());
    }

    #[test]
    fn test_stoppage_time_stays_in_period() {
        // 47:00 in period 1 is two minutes of stoppage, not period 2
        let mark = ClockMark::new(1, 47, 0);
        assert_eq!(mark.millis_into_period(), 47 * 60 * 1000);
    }
}
