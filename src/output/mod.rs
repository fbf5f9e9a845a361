//! Output writers for metric tables and run summaries.
//!
//! - CSV, one file per metric
//! - JSON run summary

pub mod json;
pub mod tables;

// Re-export main functions
pub use json::{read_summary, write_summary, MetricSummary, RunSummary};
pub use tables::{table_path, write_results, write_table};
