use matchday_pipeline::metrics::{
    extractor, run_checks, run_extractors, MatchInput, MetricStatus, MetricValue,
};
use matchday_pipeline::model::{Event, EventKind, LineupEntry, RawEvent};
use matchday_pipeline::parser::decode_lineups;
use matchday_pipeline::utils::load_config;
use matchday_pipeline::validator::validate;
use matchday_pipeline::PipelineConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;

struct Feed {
    values: Vec<Value>,
}

impl Feed {
    fn new() -> Self {
        Self { values: Vec::new() }
    }

    fn push(&mut self, period: u8, clock: &str, minute: u32, type_name: &str, extra: Value) -> &mut Self {
        let mut event = json!({
            "id": format!("e{}", self.values.len() + 1),
            "index": self.values.len() + 1,
            "period": period,
            "timestamp": clock,
            "minute": minute,
            "second": 0,
            "type": {"name": type_name},
        });
        if let (Some(obj), Some(extra)) = (event.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                obj.insert(key.clone(), value.clone());
            }
        }
        self.values.push(event);
        self
    }

    fn events(&self) -> Vec<Event> {
        let raw: Vec<RawEvent> = self.values.iter().cloned().map(RawEvent::new).collect();
        let (validated, report) = validate(&raw, &Default::default());
        assert_eq!(report.rejected, 0, "fixture rejected: {:?}", report.rejections);
        validated.into_iter().filter_map(|v| v.into_event()).collect()
    }
}

fn shot(team: u64, player: u64, x: f64, y: f64, outcome: &str) -> Value {
    json!({
        "team": {"id": team, "name": format!("Team {}", team)},
        "player": {"id": player, "name": format!("P{}", player)},
        "location": [x, y],
        "shot": {"outcome": {"name": outcome}, "body_part": {"name": "Right Foot"}}
    })
}

/// Two halves of 45 minutes with markers
fn full_match() -> Feed {
    let mut feed = Feed::new();
    feed.push(1, "00:00:00.000", 0, "Half Start", json!({}));
    feed.push(1, "00:45:00.000", 45, "Half End", json!({}));
    feed.push(2, "00:00:00.000", 45, "Half Start", json!({}));
    feed.push(2, "00:45:00.000", 90, "Half End", json!({}));
    feed
}

fn roster() -> Vec<LineupEntry> {
    let teams = json!([{
        "team_id": 1, "team_name": "Team 1",
        "lineup": [
            {
                "player_id": 11, "player_name": "Starter Subbed",
                "positions": [{"position": "Left Wing", "from": "00:00", "to": "60:00",
                    "from_period": 1, "to_period": 2,
                    "start_reason": "Starting XI", "end_reason": "Substitution - Off (Tactical)"}],
                "cards": []
            },
            {
                "player_id": 12, "player_name": "Sub Sent Off",
                "positions": [{"position": "Left Wing", "from": "60:00", "to": null,
                    "from_period": 2, "to_period": null,
                    "start_reason": "Substitution - On (Tactical)", "end_reason": "Final Whistle"}],
                "cards": [{"time": "80:00", "card_type": "Red Card", "reason": "Violent Conduct", "period": 2}]
            },
            {
                "player_id": 13, "player_name": "Unused",
                "positions": [], "cards": []
            },
            {"player_name": "No Id", "positions": []}
        ]
    }]);
    let (entries, report) = decode_lineups(teams.as_array().unwrap()).unwrap();
    assert_eq!(report.skipped.len(), 1);
    entries
}

#[test]
fn test_time_on_pitch_from_lineup_markers() {
    let events = full_match().events();
    let lineups = roster();
    let input = MatchInput { events: &events, lineups: &lineups };

    let run = extractor("player_time_on_pitch").unwrap();
    let result = run.execute(&input, &PipelineConfig::default());
    let table = result.table().unwrap();

    assert_eq!(table.column_f64("player_id"), vec![11.0, 12.0]);
    assert_eq!(table.column_f64("minutes_on_pitch"), vec![60.0, 20.0]);
}

#[test]
fn test_player_minutes_never_exceed_duration() {
    let mut feed = full_match();
    // stoppage-time event past the Half End marker
    feed.push(2, "00:49:00.000", 94, "Carry", json!({"player": {"id": 11}}));
    let events = feed.events();
    let lineups = roster();
    let input = MatchInput { events: &events, lineups: &lineups };

    let results = run_extractors(&input, &PipelineConfig::default());
    let duration = results[1].table().unwrap().column_f64("total_match_duration_seconds")[0];
    let times = results[0].table().unwrap().column_f64("seconds_on_pitch");

    assert_eq!(duration, 5400.0);
    assert!(times.iter().all(|t| *t <= duration));
    assert!(run_checks(&results)
        .iter()
        .filter(|c| c.metric == "player_time_on_pitch")
        .all(|c| c.passed));
}

#[test]
fn test_unknown_player_warns_without_failing() {
    let mut feed = full_match();
    feed.push(1, "00:05:00.000", 5, "Carry", json!({"player": {"id": 999, "name": "Ghost"}}));
    let events = feed.events();
    let lineups = roster();
    let input = MatchInput { events: &events, lineups: &lineups };

    let result = extractor("player_time_on_pitch")
        .unwrap()
        .execute(&input, &PipelineConfig::default());

    assert_eq!(result.status.label(), "computed");
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("Ghost"));
}

#[test]
fn test_goal_rows_match_goal_shots() {
    let mut feed = full_match();
    feed.push(1, "00:12:00.000", 12, "Shot", shot(1, 11, 110.0, 40.0, "Goal"));
    feed.push(1, "00:20:00.000", 20, "Shot", shot(1, 11, 100.0, 30.0, "Saved"));
    feed.push(2, "00:30:00.000", 75, "Shot", shot(2, 21, 108.0, 44.0, "Goal"));
    feed.push(2, "00:31:00.000", 76, "Own Goal Against", json!({"team": {"id": 1}}));
    let events = feed.events();

    let goal_shots = events
        .iter()
        .filter(|e| matches!(&e.kind, EventKind::Shot(s) if s.is_goal()))
        .count();
    let input = MatchInput { events: &events, lineups: &[] };
    let result = extractor("goal_minutes")
        .unwrap()
        .execute(&input, &PipelineConfig::default());
    let table = result.table().unwrap();

    assert_eq!(table.len(), goal_shots);
    assert_eq!(table.column_f64("minute"), vec![12.0, 75.0]);
}

#[test]
fn test_furthest_shot_respects_attacking_direction() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[pitch]\nlow_end_teams = [2]").unwrap();
    let config = load_config(file.path()).unwrap();

    let mut feed = full_match();
    // 20 from the high goal for team 1
    feed.push(1, "00:10:00.000", 10, "Shot", shot(1, 11, 100.0, 40.0, "Saved"));
    // 30 from the low goal for team 2
    feed.push(1, "00:11:00.000", 11, "Shot", shot(2, 21, 30.0, 40.0, "Off T"));
    let events = feed.events();
    let input = MatchInput { events: &events, lineups: &[] };

    let with_direction = extractor("furthest_shot_from_goal").unwrap().execute(&input, &config);
    let table = with_direction.table().unwrap();
    assert_eq!(table.column_f64("distance_to_goal"), vec![30.0]);

    let default = extractor("furthest_shot_from_goal")
        .unwrap()
        .execute(&input, &PipelineConfig::default());
    assert_eq!(default.table().unwrap().column_f64("distance_to_goal"), vec![90.0]);
}

#[test]
fn test_longest_gap_reports_bounding_shots() {
    let mut feed = full_match();
    feed.push(1, "00:05:00.000", 5, "Shot", shot(1, 11, 100.0, 40.0, "Saved"));
    feed.push(1, "00:40:00.000", 40, "Shot", shot(1, 11, 100.0, 40.0, "Saved"));
    feed.push(2, "00:10:00.000", 55, "Shot", shot(1, 11, 100.0, 40.0, "Saved"));
    let events = feed.events();
    let input = MatchInput { events: &events, lineups: &[] };

    let result = extractor("longest_shot_gap")
        .unwrap()
        .execute(&input, &PipelineConfig::default());
    let table = result.table().unwrap();

    assert_eq!(table.column_f64("gap_minutes"), vec![35.0]);
    assert_eq!(table.column_f64("from_minute"), vec![5.0]);
    assert_eq!(table.column_f64("to_minute"), vec![40.0]);
}

#[test]
fn test_no_shots_leaves_shot_metrics_undefined() {
    let events = full_match().events();
    let input = MatchInput { events: &events, lineups: &[] };

    for name in ["furthest_shot_from_goal", "longest_shot_gap", "first_foul_in_second_half"] {
        let result = extractor(name).unwrap().execute(&input, &PipelineConfig::default());
        assert!(
            matches!(result.status, MetricStatus::Undefined(_)),
            "{} should be undefined",
            name
        );
    }

    let passes = (extractor("total_passes_per_player").unwrap().run)(&input, &PipelineConfig::default())
        .unwrap();
    assert!(matches!(passes.value, MetricValue::Table(ref t) if t.is_empty()));
}
