//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Per-record problems (schema violations, duplicates, negative indexes) are
//! never errors here: they travel as report values next to the data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a match run while loading its input files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path} (line {line}): {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid lineup for team record {team_index}: {reason}")]
    InvalidLineup { team_index: usize, reason: String },
}

/// Errors raised by a single metric extractor
///
/// These never abort the engine; the failing metric is recorded as absent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    #[error("no events to compute from")]
    EmptyInput,

    #[error("no lineup entries available")]
    MissingLineups,

    #[error("event {event_id} is missing required field '{field}'")]
    MissingField { event_id: String, field: &'static str },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
