//! Raw input loading.
//!
//! This module handles:
//! - Locating a match's event and lineup files
//! - Reading JSON arrays and JSON lines into raw records
//! - Decoding lineup rosters into typed entries

pub mod lineups;
pub mod loader;

// Re-export main types and functions
pub use lineups::{decode_lineups, load_lineups, LineupReport};
pub use loader::{load_events, match_files};
