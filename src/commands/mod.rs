//! Command dispatch and handlers.

pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod shell;

use std::env;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::ports::TaskId;
use crate::view::{render, TaskListView};

/// Environment variable naming a cassette file to record the session into.
pub const RECORD_ENV: &str = "TASKLIST_RECORD";

/// Dispatch a parsed command to its handler.
///
/// `--replay` serves the API from a cassette. Otherwise, when
/// `TASKLIST_RECORD` names a file, every API call is recorded there.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the command fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let ctx = context_for(cli)?;
    let runtime = runtime()?;

    let stdout = std::io::stdout();
    let result = dispatch_with_context(&cli.command, &ctx, &runtime, &mut stdout.lock());

    // Write the cassette even when the command failed.
    if let Some(path) = ctx.finish()? {
        eprintln!("Recording saved to: {}", path.display());
    }

    result
}

/// Dispatch a command with the given service context, writing the page to `out`.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    runtime: &Runtime,
    out: &mut dyn Write,
) -> Result<(), String> {
    match command {
        Command::List => list::run(ctx, runtime, out),
        Command::Add { title } => add::run(ctx, runtime, title, out),
        Command::Edit { row, title, completed } => {
            edit::run(ctx, runtime, *row, title.as_deref(), *completed, out)
        }
        Command::Delete { row } => delete::run(ctx, runtime, *row, out),
        Command::Shell => {
            let stdin = std::io::stdin();
            shell::run(ctx, runtime, &mut stdin.lock(), out)
        }
    }
}

/// Builds the single-threaded runtime every command runs on.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn runtime() -> Result<Runtime, String> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}

fn context_for(cli: &Cli) -> Result<ServiceContext, String> {
    if let Some(path) = &cli.replay {
        return ServiceContext::replaying(path);
    }
    let config = Config::load(&cli.overrides())?;
    debug!(api_url = %config.api_url, timeout = ?config.timeout, "configuration resolved");
    match env::var(RECORD_ENV) {
        Ok(path) if !path.is_empty() => ServiceContext::recording(&config, Path::new(&path)),
        _ => ServiceContext::live(&config),
    }
}

/// Creates the view and performs the initial fetch.
fn mount(ctx: &ServiceContext, runtime: &Runtime) -> Result<TaskListView, String> {
    let view = TaskListView::new(Arc::clone(&ctx.api));
    runtime.block_on(view.fetch_all()).map_err(|e| format!("Error fetching todos: {e}"))?;
    Ok(view)
}

/// Maps a 1-based row number to its index and task id.
fn resolve_row(view: &TaskListView, row: usize) -> Result<(usize, TaskId), String> {
    let tasks = view.tasks();
    let index = row.checked_sub(1).ok_or("rows are numbered from 1")?;
    let task = tasks
        .get(index)
        .ok_or_else(|| format!("no row {row}; the list has {} task(s)", tasks.len()))?;
    Ok((index, task.id.clone()))
}

fn print_view(view: &TaskListView, out: &mut dyn Write) -> Result<(), String> {
    write!(out, "{}", render(&view.snapshot())).map_err(|e| format!("Failed to write output: {e}"))
}
