//! `tasklist edit` command.

use std::io::Write;

use tokio::runtime::Runtime;

use super::{mount, print_view, resolve_row};
use crate::context::ServiceContext;
use crate::view::DraftField;

/// Execute the `edit` command: open the row, apply the given fields, commit.
///
/// Fields left out keep their current value.
///
/// # Errors
///
/// Returns an error string if no field was given, the row does not exist or
/// a request fails.
pub fn run(
    ctx: &ServiceContext,
    runtime: &Runtime,
    row: usize,
    title: Option<&str>,
    completed: Option<bool>,
    out: &mut dyn Write,
) -> Result<(), String> {
    if title.is_none() && completed.is_none() {
        return Err("nothing to change: pass --title and/or --completed".to_string());
    }

    let view = mount(ctx, runtime)?;
    let (index, id) = resolve_row(&view, row)?;
    view.begin_edit(index).map_err(|e| e.to_string())?;
    if let Some(title) = title {
        view.update_draft_field(DraftField::Title(title.to_string())).map_err(|e| e.to_string())?;
    }
    if let Some(completed) = completed {
        view.update_draft_field(DraftField::Completed(completed)).map_err(|e| e.to_string())?;
    }
    runtime.block_on(view.commit_edit(&id)).map_err(|e| e.to_string())?;
    print_view(&view, out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::memory::InMemoryTaskApi;
    use crate::commands::runtime;

    #[test]
    fn marks_task_complete_keeping_title() {
        let api = Arc::new(InMemoryTaskApi::with_titles(&["a", "b"]));
        let ctx = ServiceContext::with_api(Arc::clone(&api) as _);
        let mut out = Vec::new();

        run(&ctx, &runtime().unwrap(), 2, None, Some(true), &mut out).unwrap();

        let tasks = api.tasks();
        assert_eq!(tasks[1].title, "b");
        assert!(tasks[1].completed);
        assert!(String::from_utf8(out).unwrap().contains("Complete"));
    }

    #[test]
    fn requires_a_field() {
        let ctx = ServiceContext::with_api(Arc::new(InMemoryTaskApi::new()));
        let err = run(&ctx, &runtime().unwrap(), 1, None, None, &mut Vec::new()).unwrap_err();
        assert!(err.contains("nothing to change"));
    }
}
