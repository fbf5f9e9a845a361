//! Configuration and constants for the pipeline.
//!
//! Defaults follow the StatsBomb 120x80 pitch convention. A TOML file may
//! override any of them; missing keys fall back to the defaults below.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Current run summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Pitch length along the x axis
pub const PITCH_LENGTH: f64 = 120.0;

/// Pitch width along the y axis
pub const PITCH_WIDTH: f64 = 80.0;

/// Depth of the penalty area measured from the goal line
pub const PENALTY_BOX_DEPTH: f64 = 18.0;

/// Penalty area spans y in [18, 62]
pub const PENALTY_BOX_Y_MIN: f64 = 18.0;
pub const PENALTY_BOX_Y_MAX: f64 = 62.0;

/// Fields every event must carry
pub const DEFAULT_REQUIRED_FIELDS: &[&str] = &["id", "index", "period", "timestamp", "type"];

/// Match clock minute at which each period starts (1-based period)
pub const PERIOD_CLOCK_START_MINUTES: &[u32] = &[0, 45, 90, 105, 120];

/// Name of the summary file written next to the metric tables
pub const RUN_SUMMARY_FILE: &str = "run_summary.json";

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PipelineConfig {
    /// Pitch geometry
    #[serde(default)]
    pub pitch: PitchConfig,

    /// Validation rules
    #[serde(default)]
    pub validation: ValidationRules,
}

/// Pitch geometry used by location-based metrics
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PitchConfig {
    pub length: f64,
    pub width: f64,
    pub penalty_box_depth: f64,
    pub penalty_box_y_min: f64,
    pub penalty_box_y_max: f64,

    /// Team ids attacking toward x = 0 for the whole match.
    /// Everyone else attacks toward x = length.
    pub low_end_teams: BTreeSet<u64>,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            length: PITCH_LENGTH,
            width: PITCH_WIDTH,
            penalty_box_depth: PENALTY_BOX_DEPTH,
            penalty_box_y_min: PENALTY_BOX_Y_MIN,
            penalty_box_y_max: PENALTY_BOX_Y_MAX,
            low_end_teams: BTreeSet::new(),
        }
    }
}

/// Rules applied by the schema validator
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ValidationRules {
    /// Fields that must exist and be non-null
    pub required_fields: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

/// Load pipeline configuration from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
/// * `ConfigError::Invalid` - If values are inconsistent
///
/// # Example
/// ```ignore
/// let config = load_config("matchday.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: PipelineConfig = toml::from_str(&contents)?;
    check_config(&config)?;
    Ok(config)
}

/// Reject geometry that cannot describe a pitch
fn check_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    let pitch = &config.pitch;

    if pitch.length <= 0.0 || pitch.width <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "pitch dimensions must be positive, got {}x{}",
            pitch.length, pitch.width
        )));
    }

    if pitch.penalty_box_depth <= 0.0 || pitch.penalty_box_depth > pitch.length / 2.0 {
        return Err(ConfigError::Invalid(format!(
            "penalty box depth {} does not fit the pitch",
            pitch.penalty_box_depth
        )));
    }

    if pitch.penalty_box_y_min >= pitch.penalty_box_y_max
        || pitch.penalty_box_y_min < 0.0
        || pitch.penalty_box_y_max > pitch.width
    {
        return Err(ConfigError::Invalid(format!(
            "penalty box y bounds [{}, {}] are not inside the pitch",
            pitch.penalty_box_y_min, pitch.penalty_box_y_max
        )));
    }

    Ok(())
}
