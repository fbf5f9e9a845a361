//! Presence, type and structure rules for raw event records.
//!
//! Every rule runs on every record; the caller picks the highest-priority
//! issue. Rules only read the raw JSON, they never decode.

use super::report::{Issue, RejectReason};
use crate::model::{EventType, Timestamp};
use crate::utils::config::ValidationRules;
use serde_json::{Map, Value};

/// Top-level fields holding a `{id, name}` reference
const REFERENCE_FIELDS: &[&str] = &["team", "player", "possession_team"];

/// Top-level fields holding a type-specific detail block
const DETAIL_FIELDS: &[&str] = &["pass", "shot", "foul_committed", "substitution", "bad_behaviour"];

/// Run all rules against one raw record
pub fn check_record(value: &Value, rules: &ValidationRules) -> Vec<Issue> {
    let Some(obj) = value.as_object() else {
        return vec![Issue::new(
            RejectReason::TypeMismatch,
            "record is not a JSON object",
        )];
    };

    let mut issues = Vec::new();
    check_presence(obj, rules, &mut issues);
    check_types(obj, &mut issues);
    check_structure(obj, &mut issues);
    issues
}

/// Present and non-null
fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

/// Name carried by the type tag, either `"Pass"` or `{"name": "Pass"}`
fn type_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(name) => Some(name.as_str()),
        Value::Object(tag) => tag.get("name").and_then(Value::as_str),
        _ => None,
    }
}

fn check_presence(obj: &Map<String, Value>, rules: &ValidationRules, issues: &mut Vec<Issue>) {
    for field in &rules.required_fields {
        if present(obj, field).is_none() {
            issues.push(Issue::new(
                RejectReason::MissingField,
                format!("'{}' is missing or null", field),
            ));
        }
    }
}

fn check_types(obj: &Map<String, Value>, issues: &mut Vec<Issue>) {
    let mut mismatch = |field: &str, expected: &str| {
        issues.push(Issue::new(
            RejectReason::TypeMismatch,
            format!("'{}' should be {}", field, expected),
        ));
    };

    if let Some(id) = present(obj, "id") {
        if !id.is_string() {
            mismatch("id", "text");
        }
    }

    if let Some(index) = present(obj, "index") {
        if index.as_i64().is_none() {
            mismatch("index", "an integer");
        }
    }

    if let Some(period) = present(obj, "period") {
        if period.as_i64().is_none() {
            mismatch("period", "an integer");
        }
    }

    if let Some(timestamp) = present(obj, "timestamp") {
        match timestamp.as_str() {
            Some(text) if Timestamp::parse(text).is_some() => {}
            _ => mismatch("timestamp", "an HH:MM:SS.fff clock"),
        }
    }

    for field in ["minute", "second"] {
        if let Some(value) = present(obj, field) {
            if value.as_u64().is_none() {
                mismatch(field, "a non-negative integer");
            }
        }
    }

    if let Some(tag) = present(obj, "type") {
        if type_name(tag).is_none() {
            mismatch("type", "text or an object with a name");
        }
    }

    for &field in REFERENCE_FIELDS {
        if let Some(reference) = present(obj, field) {
            if reference.get("id").and_then(Value::as_u64).is_none() {
                mismatch(field, "an object with an integer id");
            }
        }
    }

    if let Some(location) = present(obj, "location") {
        let numeric = location
            .as_array()
            .map_or(false, |coords| coords.iter().all(Value::is_number));
        if !numeric {
            mismatch("location", "an array of numbers");
        }
    }

    for &field in DETAIL_FIELDS {
        if let Some(detail) = present(obj, field) {
            if !detail.is_object() {
                mismatch(field, "an object");
            }
        }
    }
}

fn check_structure(obj: &Map<String, Value>, issues: &mut Vec<Issue>) {
    let mut flag = |reason: RejectReason, detail: String| {
        issues.push(Issue::new(reason, detail));
    };

    if let Some(period) = present(obj, "period").and_then(Value::as_i64) {
        if !(1..=i64::from(u8::MAX)).contains(&period) {
            flag(
                RejectReason::StructureInvalid,
                format!("period {} is out of range", period),
            );
        }
    }

    if let Some(coords) = present(obj, "location").and_then(Value::as_array) {
        if coords.len() < 2 {
            flag(
                RejectReason::StructureInvalid,
                format!("location has {} coordinates, need 2", coords.len()),
            );
        }
    }

    let Some(name) = present(obj, "type").and_then(type_name) else {
        return;
    };

    let event_type = match name.parse::<EventType>() {
        Ok(event_type) => event_type,
        Err(detail) => {
            flag(RejectReason::UnrecognizedType, detail);
            return;
        }
    };

    let missing = match event_type {
        EventType::Shot => obj
            .get("shot")
            .and_then(|shot| shot.get("outcome"))
            .and_then(|outcome| outcome.get("name"))
            .and_then(Value::as_str)
            .is_none()
            .then_some("shot detail needs an outcome name"),
        EventType::Pass => (!obj.get("pass").map_or(false, Value::is_object))
            .then_some("pass event needs a pass detail block"),
        EventType::Substitution => obj
            .get("substitution")
            .and_then(|sub| sub.get("replacement"))
            .and_then(|r| r.get("id"))
            .and_then(Value::as_u64)
            .is_none()
            .then_some("substitution detail needs a replacement player id"),
        _ => None,
    };

    if let Some(detail) = missing {
        flag(RejectReason::StructureInvalid, detail.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reasons(value: Value) -> Vec<RejectReason> {
        check_record(&value, &ValidationRules::default())
            .into_iter()
            .map(|i| i.reason)
            .collect()
    }

    #[test]
    fn test_clean_record_has_no_issues() {
        let value = json!({
            "id": "e1", "index": 1, "period": 1, "timestamp": "00:00:00.000",
            "type": {"id": 35, "name": "Starting XI"}
        });
        assert!(reasons(value).is_empty());
    }

    #[test]
    fn test_all_rules_run() {
        let value = json!({
            "index": "seven", "period": 1, "timestamp": "00:00:00.000",
            "type": {"name": "Shot"}, "location": [100.0]
        });
        let found = reasons(value);
        assert!(found.contains(&RejectReason::MissingField));
        assert!(found.contains(&RejectReason::TypeMismatch));
        assert!(found.contains(&RejectReason::StructureInvalid));
    }

    #[test]
    fn test_non_object_record() {
        assert_eq!(reasons(json!(42)), vec![RejectReason::TypeMismatch]);
    }

    #[test]
    fn test_unknown_type_tag() {
        let value = json!({
            "id": "e1", "index": 1, "period": 1, "timestamp": "00:00:00.000",
            "type": {"name": "Throw Banana"}
        });
        assert_eq!(reasons(value), vec![RejectReason::UnrecognizedType]);
    }

    #[test]
    fn test_period_out_of_range() {
        let value = json!({
            "id": "e1", "index": 1, "period": 0, "timestamp": "00:00:00.000",
            "type": "Pass", "pass": {}
        });
        assert_eq!(reasons(value), vec![RejectReason::StructureInvalid]);
    }

    #[test]
    fn test_substitution_needs_replacement() {
        let value = json!({
            "id": "e1", "index": 1, "period": 2, "timestamp": "00:10:00.000",
            "type": "Substitution", "substitution": {"outcome": {"name": "Tactical"}}
        });
        assert_eq!(reasons(value), vec![RejectReason::StructureInvalid]);
    }
}
