//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Maxify programmer time tracker.
///
/// Records typed metrics (story points, durations, notes) against the tasks
/// of configured projects.
#[derive(Debug, Parser)]
#[command(name = "mx", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the interactive shell (the default).
    Shell {
        /// Project to switch to on startup (name or nickname).
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List configured projects.
    Projects,

    /// List a project's metrics.
    Metrics {
        /// Project name or nickname.
        project: String,
    },

    /// Record metric values for a task, or print the task when no values are given.
    Task {
        /// Project name or nickname.
        project: String,

        /// Task name.
        task: String,

        /// Alternating metric names and values, e.g. `story_points 5 "Compile Time" "1h 30m"`.
        #[arg(value_name = "METRIC VALUE", allow_hyphen_values = true)]
        pairs: Vec<String>,
    },

    /// Parse a value with a unit, or infer the unit when none is given.
    Parse {
        /// Raw value text.
        value: String,

        /// Unit name: Int, Float, Duration, String or Enum.
        #[arg(short, long)]
        unit: Option<String>,
    },
}
