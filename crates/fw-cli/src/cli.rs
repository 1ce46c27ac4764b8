//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Focus session watcher.
///
/// Consumes a classified observation stream (present/away/gadget/...),
/// consolidates it into a session timeline, and fires staged alerts after
/// sustained unfocused time.
#[derive(Debug, Parser)]
#[command(name = "fw", version, about, long_about = None)]
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
    /// Track a live observation stream (JSONL, one observation per line).
    Track {
        /// Read observations from a file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Replay a recorded observation file with simulated time.
    Replay {
        /// The observation JSONL file to replay.
        #[arg(long)]
        input: PathBuf,
    },

    /// Render a report for a persisted session.
    Report {
        /// Path to a session JSON file.
        #[arg(long)]
        session: PathBuf,

        /// Output machine-readable JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}
