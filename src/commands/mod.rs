//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod check;
pub mod run;
pub mod utils;

// Re-export main command functions
pub use check::{execute_check, validate_check_args, CheckArgs};
pub use run::{execute_run, print_run_summary, validate_args, RunArgs};
pub use utils::{display_schema, display_version, show_summary_file};
