//! Command-line interface definition for Mentora
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, notes, stats, key management, and
//! session history.

use crate::prompts::QuickAction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mentora - AI study tutor CLI
///
/// Chat with a tutoring model, capture notes automatically, and track
/// your study streaks locally.
#[derive(Parser, Debug, Clone)]
#[command(name = "mentora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "mentora.yaml")]
    pub config: Option<String>,

    /// Data directory override
    #[arg(long, env = "MENTORA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Mentora
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive tutoring chat
    Chat {
        /// Apply a quick action to every turn (explain-simply, give-examples, quiz-me)
        #[arg(short, long, value_enum)]
        action: Option<QuickAction>,
    },

    /// Manage study notes
    Notes {
        /// Notes subcommand
        #[command(subcommand)]
        command: NoteCommand,
    },

    /// Show study analytics
    Stats {
        /// Days of recent activity to chart
        #[arg(short, long, default_value_t = 7)]
        days: u32,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the model API key
    Key {
        /// Key subcommand
        #[command(subcommand)]
        command: KeyCommand,
    },

    /// List closed study sessions
    Sessions,
}

/// Note management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// List notes, newest first
    List {
        /// Only show notes under this topic
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Add a manual note
    Add {
        /// Note content
        content: String,

        /// Topic label (derived from the content when omitted)
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Edit a note's content and/or topic
    Edit {
        /// Note id
        id: String,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// New topic label
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },

    /// List notes grouped by topic
    Topics,
}

/// API key subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum KeyCommand {
    /// Store the API key
    Set {
        /// The key value
        key: String,
    },

    /// Show whether a key is configured
    Show,

    /// Remove the stored key
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
