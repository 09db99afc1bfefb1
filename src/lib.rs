//! Core library entry for the `tasklist` CLI.
//!
//! A terminal client for a remote task list: a [`view::TaskListView`] owns the
//! page state and talks to the REST service through the [`ports::TaskApi`]
//! port, with live, recording, replaying and in-memory adapters behind it.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod logging;
pub mod ports;
pub mod view;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return err.print().map_err(|e| format!("Failed to write output: {e}"));
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init_tracing(cli.verbose, cli.quiet)?;
    commands::dispatch(&cli)
}
