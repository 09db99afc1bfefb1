//! `tasklist add` command.

use std::io::Write;

use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::warn;

use super::print_view;
use crate::context::ServiceContext;
use crate::view::TaskListView;

/// Execute the `add` command.
///
/// A failed initial load is logged only; the create does not need the list.
///
/// # Errors
///
/// Returns the validation alert for a blank title, or an error string if a
/// request fails.
pub fn run(
    ctx: &ServiceContext,
    runtime: &Runtime,
    title: &str,
    out: &mut dyn Write,
) -> Result<(), String> {
    let view = TaskListView::new(Arc::clone(&ctx.api));
    if let Err(e) = runtime.block_on(view.fetch_all()) {
        warn!(error = %e, "initial load failed, adding anyway");
    }
    runtime.block_on(view.add_task(title)).map_err(|e| e.to_string())?;
    print_view(&view, out)
}
