//! `tasklist shell`: the interactive task list page.
//!
//! The page is re-rendered after every command. Request failures are only
//! logged; the one alert shown to the user is the empty-title refusal.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::debug;

use crate::context::ServiceContext;
use crate::view::{render, DraftField, TaskListView, ViewError};

const HELP: &str = "\
Commands:
  new <text>     type into the new-task input
  add [text]     add the typed (or given) task
  edit <row>     edit a row
  title <text>   change the title of the row being edited
  done           mark the row being edited Complete
  pending        mark the row being edited Pending
  save           save the row being edited
  cancel         stop editing without saving
  delete <row>   delete a row
  refresh        reload the list
  help           show this help
  quit           leave";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Replace the new-task input.
    Type(String),
    /// Add the typed task, or the given text.
    Add(Option<String>),
    /// Enter edit mode on a 1-based row.
    Edit(usize),
    /// Change the draft title.
    Title(String),
    /// Change the draft completion flag.
    Completed(bool),
    /// Commit the edit.
    Save,
    /// Abandon the edit.
    Cancel,
    /// Delete a 1-based row.
    Delete(usize),
    /// Re-fetch the list.
    Refresh,
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let text = || {
            if rest.is_empty() {
                Err(format!("`{word}` needs some text"))
            } else {
                Ok(rest.to_string())
            }
        };
        let row = || {
            rest.parse::<usize>()
                .ok()
                .filter(|row| *row > 0)
                .ok_or_else(|| format!("`{word}` needs a row number, e.g. `{word} 1`"))
        };

        match word.to_ascii_lowercase().as_str() {
            "new" => Ok(Self::Type(rest.to_string())),
            "add" => Ok(Self::Add((!rest.is_empty()).then(|| rest.to_string()))),
            "edit" => row().map(Self::Edit),
            "title" => text().map(Self::Title),
            "done" | "complete" => Ok(Self::Completed(true)),
            "pending" => Ok(Self::Completed(false)),
            "save" | "update" => Ok(Self::Save),
            "cancel" => Ok(Self::Cancel),
            "delete" | "rm" => row().map(Self::Delete),
            "refresh" | "list" => Ok(Self::Refresh),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err("type `help` for commands".to_string()),
            other => Err(format!("unknown command `{other}`; type `help` for commands")),
        }
    }
}

/// Execute the `shell` command, reading commands from `input` until `quit` or EOF.
///
/// # Errors
///
/// Returns an error string only if reading input or writing output fails.
pub fn run(
    ctx: &ServiceContext,
    runtime: &Runtime,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), String> {
    let view = TaskListView::new(Arc::clone(&ctx.api));
    // Mount failures are logged by the view; the page still opens.
    let _ = runtime.block_on(view.fetch_all());

    let mut line = String::new();
    loop {
        write!(out, "{}> ", render(&view.snapshot())).map_err(write_error)?;
        out.flush().map_err(write_error)?;

        line.clear();
        if input.read_line(&mut line).map_err(|e| format!("Failed to read input: {e}"))? == 0 {
            writeln!(out).map_err(write_error)?;
            return Ok(());
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}").map_err(write_error)?;
                continue;
            }
        };
        debug!(?command, "shell command");

        let outcome = match command {
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Help => {
                writeln!(out, "{HELP}").map_err(write_error)?;
                Ok(())
            }
            ShellCommand::Type(text) => {
                view.set_draft_title(text);
                Ok(())
            }
            ShellCommand::Add(text) => {
                if let Some(text) = text {
                    view.set_draft_title(text);
                }
                runtime.block_on(view.submit_draft())
            }
            ShellCommand::Edit(row) => view.begin_edit(row - 1),
            ShellCommand::Title(title) => view.update_draft_field(DraftField::Title(title)),
            ShellCommand::Completed(completed) => {
                view.update_draft_field(DraftField::Completed(completed))
            }
            ShellCommand::Save => match view.snapshot().editing {
                Some(edit) => runtime.block_on(view.commit_edit(&edit.id)),
                None => Err(ViewError::NotEditing),
            },
            ShellCommand::Cancel => {
                if view.cancel_edit() {
                    Ok(())
                } else {
                    Err(ViewError::NotEditing)
                }
            }
            ShellCommand::Delete(row) => match view.tasks().get(row - 1) {
                Some(task) => runtime.block_on(view.delete_task(&task.id)),
                None => Err(ViewError::NoSuchRow(row - 1)),
            },
            ShellCommand::Refresh => runtime.block_on(view.fetch_all()),
        };

        match outcome {
            Ok(()) | Err(ViewError::Request(_)) => {}
            Err(ViewError::NoSuchRow(index)) => {
                writeln!(out, "There is no row {}.", index + 1).map_err(write_error)?;
            }
            Err(other) => writeln!(out, "{other}").map_err(write_error)?,
        }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn write_error(e: std::io::Error) -> String {
    format!("Failed to write output: {e}")
}
