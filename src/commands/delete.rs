//! `tasklist delete` command.

use std::io::Write;

use tokio::runtime::Runtime;

use super::{mount, print_view, resolve_row};
use crate::context::ServiceContext;

/// Execute the `delete` command for the task shown at `row`.
///
/// # Errors
///
/// Returns an error string if the row does not exist or a request fails.
pub fn run(
    ctx: &ServiceContext,
    runtime: &Runtime,
    row: usize,
    out: &mut dyn Write,
) -> Result<(), String> {
    let view = mount(ctx, runtime)?;
    let (_, id) = resolve_row(&view, row)?;
    runtime.block_on(view.delete_task(&id)).map_err(|e| e.to_string())?;
    print_view(&view, out)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::memory::InMemoryTaskApi;
    use crate::commands::runtime;

    #[test]
    fn deletes_row_by_number() {
        let api = Arc::new(InMemoryTaskApi::with_titles(&["a", "b", "c"]));
        let ctx = ServiceContext::with_api(Arc::clone(&api) as _);

        run(&ctx, &runtime().unwrap(), 2, &mut Vec::new()).unwrap();

        let titles: Vec<_> = api.tasks().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["a", "c"]);
    }

    #[test]
    fn unknown_row_sends_no_delete() {
        let api = Arc::new(InMemoryTaskApi::with_titles(&["a"]));
        let ctx = ServiceContext::with_api(Arc::clone(&api) as _);

        assert!(run(&ctx, &runtime().unwrap(), 4, &mut Vec::new()).is_err());
        assert_eq!(api.tasks().len(), 1);
        assert_eq!(api.calls().len(), 1);
    }
}
