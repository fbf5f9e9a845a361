//! Metrics engine.
//!
//! Each extractor is an independent, read-only function over the
//! deduplicated events and the lineup roster. The engine runs them in
//! parallel and records a failure per metric instead of aborting.

pub mod checks;
pub mod fouls;
pub mod geometry;
pub mod goals;
pub mod passes;
pub mod penalty_box;
pub mod playing_time;
pub mod shots;
pub mod table;

pub use checks::{run_checks, CheckResult, Severity};
pub use fouls::first_foul_in_second_half;
pub use geometry::GoalEnd;
pub use goals::goal_minutes;
pub use passes::total_passes_per_player;
pub use penalty_box::{penalty_box_event_counts, penalty_box_events};
pub use playing_time::{match_duration, player_time_on_pitch};
pub use shots::{furthest_shot_from_goal, longest_shot_gap};
pub use table::{Cell, Extraction, MetricResult, MetricStatus, MetricTable, MetricValue, TableRow};

use crate::model::{Event, LineupEntry};
use crate::utils::config::PipelineConfig;
use crate::utils::error::ExtractorError;
use log::{debug, info, warn};
use rayon::prelude::*;

/// Immutable data every extractor reads
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub events: &'a [Event],
    pub lineups: &'a [LineupEntry],
}

type ExtractFn = fn(&MatchInput<'_>, &PipelineConfig) -> Result<Extraction, ExtractorError>;

/// A registered metric extractor
pub struct Extractor {
    pub name: &'static str,
    pub section: &'static str,
    pub columns: &'static [&'static str],
    pub run: ExtractFn,
}

/// All extractors, in output order
pub const EXTRACTORS: &[Extractor] = &[
    Extractor {
        name: "player_time_on_pitch",
        section: "2a",
        columns: <playing_time::PlayerTime as TableRow>::COLUMNS,
        run: player_time_on_pitch,
    },
    Extractor {
        name: "match_duration",
        section: "2b",
        columns: <playing_time::MatchDuration as TableRow>::COLUMNS,
        run: match_duration,
    },
    Extractor {
        name: "total_passes_per_player",
        section: "2c",
        columns: <passes::PassCount as TableRow>::COLUMNS,
        run: total_passes_per_player,
    },
    Extractor {
        name: "goal_minutes",
        section: "2d",
        columns: <goals::GoalMinute as TableRow>::COLUMNS,
        run: goal_minutes,
    },
    Extractor {
        name: "first_foul_in_second_half",
        section: "2e",
        columns: <fouls::FirstFoul as TableRow>::COLUMNS,
        run: first_foul_in_second_half,
    },
    Extractor {
        name: "furthest_shot_from_goal",
        section: "3f",
        columns: <shots::FurthestShot as TableRow>::COLUMNS,
        run: furthest_shot_from_goal,
    },
    Extractor {
        name: "penalty_box_events",
        section: "3g",
        columns: <penalty_box::BoxEvent as TableRow>::COLUMNS,
        run: penalty_box_events,
    },
    Extractor {
        name: "penalty_box_event_counts",
        section: "3g",
        columns: <penalty_box::BoxEventCount as TableRow>::COLUMNS,
        run: penalty_box_event_counts,
    },
    Extractor {
        name: "longest_shot_gap",
        section: "3h",
        columns: <shots::ShotGap as TableRow>::COLUMNS,
        run: longest_shot_gap,
    },
];

/// Look up a registered extractor by metric name
pub fn extractor(name: &str) -> Option<&'static Extractor> {
    EXTRACTORS.iter().find(|e| e.name == name)
}

impl Extractor {
    /// Run this extractor and fold its outcome into a result
    pub fn execute(&self, input: &MatchInput<'_>, config: &PipelineConfig) -> MetricResult {
        let (status, warnings) = match (self.run)(input, config) {
            Ok(Extraction { value: MetricValue::Table(table), warnings }) => {
                debug!("{}: {} rows", self.name, table.len());
                (MetricStatus::Computed(table), warnings)
            }
            Ok(Extraction { value: MetricValue::Undefined(reason), warnings }) => {
                info!("{} is undefined: {}", self.name, reason);
                (MetricStatus::Undefined(reason), warnings)
            }
            Err(e) => {
                warn!("{} failed: {}", self.name, e);
                (MetricStatus::Failed(e.to_string()), Vec::new())
            }
        };

        MetricResult {
            name: self.name,
            section: self.section,
            status,
            warnings,
        }
    }
}

/// Run every registered extractor
///
/// **Public** - third pipeline stage
///
/// Extractors run in parallel; results come back in registry order.
pub fn run_extractors(input: &MatchInput<'_>, config: &PipelineConfig) -> Vec<MetricResult> {
    info!(
        "Running {} extractors over {} events and {} lineup entries",
        EXTRACTORS.len(),
        input.events.len(),
        input.lineups.len()
    );

    EXTRACTORS
        .par_iter()
        .map(|extractor| extractor.execute(input, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, EventType, Timestamp};

    #[test]
    fn test_registry_names_are_unique() {
        let mut stems: Vec<String> = EXTRACTORS
            .iter()
            .map(|e| format!("{}_{}", e.section, e.name))
            .collect();
        stems.sort();
        stems.dedup();
        assert_eq!(stems.len(), EXTRACTORS.len());
    }

    #[test]
    fn test_empty_input_fails_every_extractor() {
        let input = MatchInput {
            events: &[],
            lineups: &[],
        };
        let results = run_extractors(&input, &PipelineConfig::default());

        assert_eq!(results.len(), EXTRACTORS.len());
        assert!(results
            .iter()
            .all(|r| matches!(r.status, MetricStatus::Failed(_))));
    }

    #[test]
    fn test_failure_is_isolated() {
        let events = vec![Event {
            id: "k".to_string(),
            index: 1,
            period: 1,
            timestamp: Timestamp::ZERO,
            minute: 0,
            second: 0,
            team: None,
            player: None,
            location: None,
            kind: EventKind::Other(EventType::HalfStart),
        }];
        let input = MatchInput {
            events: &events,
            lineups: &[],
        };
        let results = run_extractors(&input, &PipelineConfig::default());

        let names: Vec<&str> = results.iter().map(|r| r.name).collect();
        let expected: Vec<&str> = EXTRACTORS.iter().map(|e| e.name).collect();
        assert_eq!(names, expected);

        assert_eq!(results[0].status.label(), "failed");
        assert_eq!(results[2].status.label(), "computed");
        assert_eq!(
            extractor("longest_shot_gap").map(|e| e.section),
            Some("3h")
        );
    }
}
