use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notecal", version, about = "Keyboard-driven notes and calendar client")]
pub struct Cli {
    /// Notes server base URL (overrides the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// Path to an alternative config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes on the server
    List,
    /// Create a note
    Add {
        /// Title of the note
        title: String,
        /// Description of the note
        #[arg(long, short = 'd')]
        description: String,
        /// Timestamp in YYYY-MM-DD HH:MM[:SS] format (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Edit an existing note
    Edit {
        /// Note id to edit
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,
        /// New timestamp (YYYY-MM-DD HH:MM[:SS])
        #[arg(long)]
        at: Option<String>,
    },
    /// Delete a note
    Delete {
        /// Note id to delete
        id: i64,
    },
    /// Print the calendar events derived from the notes
    Events,
    /// Show the local activity report
    Activity,
    /// Launch the interactive TUI
    Tui,
}
