//! Matchday Pipeline
//!
//! Validation, deduplication and metric extraction for football match
//! event data in the StatsBomb open-data format.
//!
//! This crate provides the core implementation for the `matchday` CLI
//! tool. Each stage is a plain function over the previous stage's output:
//!
//! ```ignore
//! let raw = parser::load_events("data/events_3788741.json")?;
//! let (lineups, _) = parser::load_lineups("data/lineups_3788741.json")?;
//! let run = pipeline::run_match(&raw, &lineups, &PipelineConfig::default());
//! output::write_results(&run.results, "output")?;
//! ```

pub mod commands;
pub mod dedup;
pub mod metrics;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod utils;
pub mod validator;

pub use pipeline::{run_match, MatchRun};
pub use utils::config::PipelineConfig;
