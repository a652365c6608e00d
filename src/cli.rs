//! CLI argument parsing for taches.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taches",
    about = "A small personal task list backed by SQLite",
    version,
    after_help = "Logs are written to: ~/.local/share/taches/logs/taches.log"
)]
pub struct Cli {
    /// Path to the task database (overrides config and TACHES_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Skip confirmation prompts for destructive commands
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Description
        #[arg(short = 'D', long, default_value = "")]
        description: String,
    },

    /// List tasks, oldest first
    List {
        /// Hide completed tasks
        #[arg(short, long)]
        pending: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a task by ID
    Show {
        /// Task ID
        id: i64,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Edit a task's title and/or description
    Edit {
        /// Task ID
        id: i64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Mark a task done, or not done again
    Toggle {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },

    /// Delete every task
    Reset,

    /// Add five sample tasks
    Seed,

    /// Print the effective configuration
    Config,
}
