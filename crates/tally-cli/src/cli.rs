//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-08-30)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Tally - Interactive grading session tool
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "TALLY_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Grade a roster, resuming if the session already exists
    Grade {
        /// Unique session identifier (for example ECE452_HW3)
        #[arg(required = true)]
        session: String,

        /// CSV file with subject names in the first column, no header
        #[arg(short, long)]
        names: PathBuf,

        /// Text file with `question:subitem:points:answer` lines
        #[arg(long)]
        solutions: Option<PathBuf>,

        /// Filename prefix for exported score reports
        #[arg(short, long, default_value = "scores")]
        output: String,

        /// Maximum achievable score (prompted for if omitted)
        #[arg(short, long)]
        max_score: Option<i64>,
    },

    /// List saved sessions with their progress
    Sessions,

    /// Show a saved session's progress and configuration
    Status {
        /// Session identifier
        session: String,
    },

    /// Write a fresh timestamped export from a saved session
    Export {
        /// Session identifier
        session: String,
    },
}

impl Cli {
    /// Returns the state directory path, using the default if not
    /// specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(tally_core::config::state_dir)
    }

    /// Maps the verbosity count to a tracing level.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
