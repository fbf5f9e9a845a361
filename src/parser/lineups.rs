//! Lineup file decoding.
//!
//! Each team record carries its roster; every player lists the positions
//! they occupied (with clock marks for when they took and left each one)
//! and any cards received. These are folded into one `LineupEntry` per
//! player with explicit start/end-of-appearance markers.

use super::loader::read_json_records;
use crate::model::{is_sending_off, ClockMark, LineupEntry};
use crate::utils::error::LoadError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Fields every team record must carry
const TEAM_REQUIRED_FIELDS: &[&str] = &["team_id", "team_name", "lineup"];

/// Summary of lineup decoding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineupReport {
    pub teams: usize,
    pub players: usize,
    pub appeared: usize,

    /// Roster records dropped (e.g. without a player id)
    pub skipped: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    team_id: u64,
    team_name: String,
    lineup: Vec<PlayerRecord>,
}

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    player_id: Option<u64>,
    player_name: Option<String>,
    player_nickname: Option<String>,
    jersey_number: Option<u32>,
    #[serde(default)]
    positions: Vec<PositionRecord>,
    #[serde(default)]
    cards: Vec<CardRecord>,
}

#[derive(Debug, Deserialize)]
struct PositionRecord {
    position: Option<String>,
    from: Option<String>,
    to: Option<String>,
    from_period: Option<u8>,
    to_period: Option<u8>,
    start_reason: Option<String>,
    end_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CardRecord {
    time: Option<String>,
    card_type: String,
    period: Option<u8>,
}

/// Load and decode a lineup file
///
/// # Errors
/// * `LoadError::Io` / `LoadError::Json` - File unreadable or not JSON
/// * `LoadError::InvalidLineup` - A team record lacks its required fields
pub fn load_lineups(
    path: impl AsRef<Path>,
) -> Result<(Vec<LineupEntry>, LineupReport), LoadError> {
    let path = path.as_ref();
    info!("Loading lineups from {}", path.display());

    let records = read_json_records(path)?;
    decode_lineups(&records)
}

/// Decode already-parsed team records
pub fn decode_lineups(teams: &[Value]) -> Result<(Vec<LineupEntry>, LineupReport), LoadError> {
    let mut entries = Vec::new();
    let mut report = LineupReport {
        teams: teams.len(),
        ..Default::default()
    };

    for (team_index, value) in teams.iter().enumerate() {
        let team = decode_team(team_index, value)?;

        for (slot, player) in team.lineup.into_iter().enumerate() {
            let Some(player_id) = player.player_id else {
                let note = format!("{}: roster slot {} has no player_id", team.team_name, slot);
                warn!("{}", note);
                report.skipped.push(note);
                continue;
            };

            let entry = to_entry(team.team_id, &team.team_name, player_id, player);
            if entry.appeared() {
                report.appeared += 1;
            }
            entries.push(entry);
        }
    }

    report.players = entries.len();
    debug!(
        "Decoded {} players across {} teams ({} appeared)",
        report.players, report.teams, report.appeared
    );

    Ok((entries, report))
}

fn decode_team(team_index: usize, value: &Value) -> Result<TeamRecord, LoadError> {
    let obj = value.as_object().ok_or_else(|| LoadError::InvalidLineup {
        team_index,
        reason: "team record is not an object".to_string(),
    })?;

    let missing: Vec<&str> = TEAM_REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| obj.get(*field).map_or(true, Value::is_null))
        .collect();

    if !missing.is_empty() {
        return Err(LoadError::InvalidLineup {
            team_index,
            reason: format!("missing fields: {}", missing.join(", ")),
        });
    }

    TeamRecord::deserialize(value).map_err(|e| LoadError::InvalidLineup {
        team_index,
        reason: e.to_string(),
    })
}

fn to_entry(team_id: u64, team_name: &str, player_id: u64, player: PlayerRecord) -> LineupEntry {
    let first = player.positions.first();
    let last = player.positions.last();

    let starter = first.map_or(false, is_starting_position);

    let on = if starter {
        None
    } else {
        first.and_then(|p| ClockMark::parse(p.from.as_deref()?, p.from_period))
    };

    let off = last
        .filter(|p| !ended_at_final_whistle(p))
        .and_then(|p| ClockMark::parse(p.to.as_deref()?, p.to_period));

    let sent_off = player
        .cards
        .iter()
        .filter(|c| is_sending_off(&c.card_type))
        .filter_map(|c| {
            // Cards without a period take it from the last position before
            // falling back to the minute
            let period = c.period.or_else(|| last.and_then(|p| p.to_period));
            ClockMark::parse(c.time.as_deref()?, period)
        })
        .min();

    let player_name = player
        .player_nickname
        .or(player.player_name)
        .unwrap_or_else(|| "Unknown".to_string());

    LineupEntry {
        team_id,
        team_name: team_name.to_string(),
        player_id,
        player_name,
        position: first.and_then(|p| p.position.clone()),
        shirt_number: player.jersey_number,
        starter,
        on,
        off,
        sent_off,
    }
}

fn is_starting_position(position: &PositionRecord) -> bool {
    match position.start_reason.as_deref() {
        Some(reason) => reason.eq_ignore_ascii_case("starting xi"),
        None => {
            position.from_period.unwrap_or(1) == 1
                && position
                    .from
                    .as_deref()
                    .and_then(|f| ClockMark::parse(f, Some(1)))
                    .map_or(false, |m| m.minute == 0 && m.second == 0)
        }
    }
}

fn ended_at_final_whistle(position: &PositionRecord) -> bool {
    position
        .end_reason
        .as_deref()
        .map_or(false, |r| r.to_ascii_lowercase().contains("final whistle"))
}
