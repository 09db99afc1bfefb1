//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::Overrides;

/// Top-level CLI parser for `tasklist`.
#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Manage a remote task list")]
pub struct Cli {
    /// Task collection URL (overrides `TASKLIST_API_URL`).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Bearer token (overrides `TASKLIST_TOKEN`); generated per run when unset.
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Request timeout in seconds (overrides `TASKLIST_TIMEOUT_SECS`).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Serve the API from a recorded cassette instead of the network.
    #[arg(long, global = true, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,

    /// More diagnostic output (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less diagnostic output (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Configuration values given as flags.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and print all tasks.
    List,
    /// Create a task.
    Add {
        /// Title of the new task.
        title: String,
    },
    /// Change the title and/or completion of a task.
    Edit {
        /// Row number as printed in the `No` column.
        row: usize,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New completion state (`true` or `false`).
        #[arg(long, value_name = "BOOL")]
        completed: Option<bool>,
    },
    /// Delete a task.
    Delete {
        /// Row number as printed in the `No` column.
        row: usize,
    },
    /// Open the interactive task list.
    Shell,
}
