//! Goal timings.

use super::table::{Cell, Extraction, TableRow};
use super::MatchInput;
use crate::model::{Event, EventKind, Timestamp};
use crate::utils::config::PipelineConfig;
use crate::utils::error::ExtractorError;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalMinute {
    pub event_id: String,
    pub player_id: Option<u64>,
    pub player_name: String,
    pub team_name: String,
    pub period: u8,
    pub minute: u32,
    pub second: u32,
    pub timestamp: Timestamp,
    pub technique: Option<String>,
    pub body_part: Option<String>,
}

impl TableRow for GoalMinute {
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "player_id",
        "player_name",
        "team_name",
        "period",
        "minute",
        "second",
        "timestamp",
        "technique",
        "body_part",
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
            self.timestamp.to_string().into(),
            self.technique.clone().into(),
            self.body_part.clone().into(),
        ]
    }
}

/// Every scoring shot, ordered by time of occurrence
pub fn find_goals(events: &[Event]) -> Vec<GoalMinute> {
    let mut goals: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(&e.kind, EventKind::Shot(shot) if shot.is_goal()))
        .collect();
    goals.sort_by_key(|e| e.occurrence_key());

    goals
        .into_iter()
        .filter_map(|event| {
            let EventKind::Shot(shot) = &event.kind else {
                return None;
            };
            Some(GoalMinute {
                event_id: event.id.clone(),
                player_id: event.player_id(),
                player_name: event.player_name().to_string(),
                team_name: event.team_name().to_string(),
                period: event.period,
                minute: event.minute,
                second: event.second,
                timestamp: event.timestamp,
                technique: shot.technique.clone(),
                body_part: shot.body_part.clone(),
            })
        })
        .collect()
}

/// Extractor: minute and second of each goal
pub fn goal_minutes(
    input: &MatchInput<'_>,
    _config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(Extraction::table(&find_goals(input.events)))
}
