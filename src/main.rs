//! Matchday CLI
//!
//! Validates, deduplicates and derives metrics from one football match's
//! event and lineup files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use matchday_pipeline::commands::{
    display_schema, display_version, execute_check, execute_run, show_summary_file,
    validate_args, validate_check_args, CheckArgs, RunArgs,
};

/// Matchday - football match event pipeline
#[derive(Parser, Debug)]
#[command(name = "matchday")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline for one match and write metric tables
    Run {
        /// Match identifier (files are events_<id>.json and lineups_<id>.json)
        #[arg(short, long)]
        match_id: String,

        /// Directory holding the match files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory for metric tables and the run summary
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// TOML pipeline configuration
        #[arg(short, long, env = "MATCHDAY_CONFIG")]
        config: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate and deduplicate a match without computing metrics
    Check {
        /// Match identifier
        #[arg(short, long)]
        match_id: String,

        /// Directory holding the match files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// TOML pipeline configuration
        #[arg(short, long, env = "MATCHDAY_CONFIG")]
        config: Option<PathBuf>,

        /// Number of rejected records to list
        #[arg(long, default_value = "10")]
        show_rejections: usize,

        /// Exit with an error if any record is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Display a run summary JSON file
    Summary {
        /// Path to run_summary.json
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display output table schemas
    Schema {
        /// Show column details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Run {
            match_id,
            data_dir,
            output,
            config,
            summary,
        } => {
            let args = RunArgs {
                data_dir,
                match_id,
                output_dir: output,
                config,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_run(args)?;
        }

        Commands::Check {
            match_id,
            data_dir,
            config,
            show_rejections,
            strict,
        } => {
            let args = CheckArgs {
                data_dir,
                match_id,
                config,
                show_rejections,
                strict,
            };

            validate_check_args(&args)?;

            execute_check(args)?;
        }

        Commands::Summary { file } => {
            show_summary_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
