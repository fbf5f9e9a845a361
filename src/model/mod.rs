//! Shared record model for the pipeline.
//!
//! This module defines:
//! - Raw and typed event records
//! - Lineup roster entries and match-clock marks
//! - The continuous match timeline used by time-based metrics

pub mod clock;
pub mod event;
pub mod lineup;

// Re-export main types
pub use clock::{MatchClock, PeriodSpan};
pub use event::{
    is_sending_off, CardDetail, Event, EventKind, EventType, FoulDetail, Location, PassDetail,
    PlayerRef, RawEvent, ShotDetail, SubstitutionDetail, TeamRef, Timestamp,
};
pub use lineup::{period_clock_start, ClockMark, LineupEntry};
