//! Pass counts per player.

use super::table::{Cell, Extraction, TableRow};
use super::MatchInput;
use crate::model::{Event, EventKind};
use crate::utils::config::PipelineConfig;
use crate::utils::error::ExtractorError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PassCount {
    pub player_id: u64,
    pub player_name: String,
    pub team_name: String,
    pub total_passes: usize,
}

impl TableRow for PassCount {
    const COLUMNS: &'static [&'static str] =
        &["player_id", "player_name", "team_name", "total_passes"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.player_id.into(),
            self.player_name.as_str().into(),
            self.team_name.as_str().into(),
            self.total_passes.into(),
        ]
    }
}

/// Count passes by acting player
///
/// Sparse: a player appears only with at least one pass. Sorted by count
/// descending, then player id. Passes without an acting player are skipped.
pub fn count_passes(events: &[Event]) -> Vec<PassCount> {
    let mut counts: HashMap<u64, PassCount> = HashMap::new();

    for event in events {
        if !matches!(event.kind, EventKind::Pass(_)) {
            continue;
        }
        let Some(player_id) = event.player_id() else {
            continue;
        };

        counts
            .entry(player_id)
            .or_insert_with(|| PassCount {
                player_id,
                player_name: event.player_name().to_string(),
                team_name: event.team_name().to_string(),
                total_passes: 0,
            })
            .total_passes += 1;
    }

    let mut rows: Vec<PassCount> = counts.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_passes
            .cmp(&a.total_passes)
            .then(a.player_id.cmp(&b.player_id))
    });
    rows
}

/// Extractor: total passes per player
pub fn total_passes_per_player(
    input: &MatchInput<'_>,
    _config: &PipelineConfig,
) -> Result<Extraction, ExtractorError> {
    if input.events.is_empty() {
        return Err(ExtractorError::EmptyInput);
    }

    Ok(Extraction::table(&count_passes(input.events)))
}
