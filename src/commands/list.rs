//! `tasklist list` command.

use std::io::Write;

use tokio::runtime::Runtime;

use super::{mount, print_view};
use crate::context::ServiceContext;

/// Execute the `list` command: fetch the collection and print the page.
///
/// # Errors
///
/// Returns an error string if the fetch fails.
pub fn run(ctx: &ServiceContext, runtime: &Runtime, out: &mut dyn Write) -> Result<(), String> {
    let view = mount(ctx, runtime)?;
    print_view(&view, out)
}
