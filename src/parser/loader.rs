//! Raw file loading for match event and lineup files.
//!
//! Feeds arrive either as one JSON array or as JSON lines (one record, or
//! one array of records, per line). A UTF-8 byte order mark is tolerated.

use crate::model::RawEvent;
use crate::utils::error::LoadError;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of the event and lineup files for a match
///
/// Files follow the `events_<match_id>.json` / `lineups_<match_id>.json`
/// naming convention.
pub fn match_files(data_dir: impl AsRef<Path>, match_id: &str) -> (PathBuf, PathBuf) {
    let dir = data_dir.as_ref();
    (
        dir.join(format!("events_{}.json", match_id)),
        dir.join(format!("lineups_{}.json", match_id)),
    )
}

/// Load raw event records from a file
///
/// Individual records are not inspected here; a record that is not an
/// object is left for the validator to reject.
///
/// # Errors
/// * `LoadError::Io` - File cannot be read
/// * `LoadError::Json` - File is not valid JSON / JSON lines
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<RawEvent>, LoadError> {
    let path = path.as_ref();
    info!("Loading events from {}", path.display());

    let records = read_json_records(path)?;
    debug!("Loaded {} raw event records", records.len());

    Ok(records.into_iter().map(RawEvent::new).collect())
}

/// Read every JSON record from a file, flattening top-level arrays
pub(crate) fn read_json_records(path: &Path) -> Result<Vec<Value>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_json_records(&text, path)
}

/// Parse a document as a JSON array or as JSON lines
pub(crate) fn parse_json_records(text: &str, path: &Path) -> Result<Vec<Value>, LoadError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    // Whole-document array (possibly pretty printed over many lines)
    if trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            let mut records = Vec::new();
            flatten_into(value, &mut records);
            return Ok(records);
        }
    }

    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            line: line_no + 1,
            source,
        })?;
        flatten_into(value, &mut records);
    }

    Ok(records)
}

fn flatten_into(value: Value, records: &mut Vec<Value>) {
    match value {
        Value::Array(items) => records.extend(items),
        other => records.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(text: &str) -> Result<Vec<Value>, LoadError> {
        parse_json_records(text, Path::new("test.json"))
    }

    #[test]
    fn test_parse_array_document() {
        let records = parse("[\n  {\"id\": \"a\"},\n  {\"id\": \"b\"}\n]").unwrap();
        assert_eq!(records, vec![json!({"id": "a"}), json!({"id": "b"})]);
    }

    #[test]
    fn test_parse_json_lines_with_bom() {
        let records = parse("\u{feff}{\"id\": \"a\"}\n\n{\"id\": \"b\"}\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_array_per_line() {
        let records = parse("[{\"id\": \"a\"}, {\"id\": \"b\"}]\n[{\"id\": \"c\"}]").unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = parse("{\"id\": \"a\"}\n{broken").unwrap_err();
        match err {
            LoadError::Json { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_match_files() {
        let (events, lineups) = match_files("data", "3788741");
        assert_eq!(events, PathBuf::from("data/events_3788741.json"));
        assert_eq!(lineups, PathBuf::from("data/lineups_3788741.json"));
    }
}
