//! Plain-text rendering of the task list page.

use std::fmt::Write as _;

use super::ViewSnapshot;

/// Shown instead of the table when the list is empty.
pub const EMPTY_MESSAGE: &str = "No any Todo Data available";
/// Shown instead of the table while a request is outstanding.
pub const LOADING_MESSAGE: &str = "Loading...";
/// Placeholder of the new-task input.
pub const INPUT_PLACEHOLDER: &str = "Enter Your Task Details...";

/// Label for a completion flag.
#[must_use]
pub fn status_label(completed: bool) -> &'static str {
    if completed {
        "Complete"
    } else {
        "Pending"
    }
}

/// Renders the input line followed by the spinner, the empty message or the table.
///
/// The row in edit mode shows its draft values in brackets.
#[must_use]
pub fn render(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();

    let input =
        if snapshot.draft_title.is_empty() { INPUT_PLACEHOLDER } else { &snapshot.draft_title };
    let _ = writeln!(out, "[ {input} ]  + Add Todo");
    out.push('\n');

    if snapshot.is_loading {
        out.push_str(LOADING_MESSAGE);
        out.push('\n');
        return out;
    }
    if snapshot.tasks.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
        return out;
    }

    let editing = snapshot.editing.as_ref();
    let rows: Vec<[String; 4]> = snapshot
        .tasks
        .iter()
        .enumerate()
        .map(|(index, task)| match editing.filter(|edit| edit.index == index) {
            Some(edit) => [
                (index + 1).to_string(),
                format!("[{}]", edit.draft.title),
                format!("[{}]", status_label(edit.draft.completed)),
                "save | cancel | delete".to_string(),
            ],
            None => [
                (index + 1).to_string(),
                task.title.clone(),
                status_label(task.completed).to_string(),
                "edit | delete".to_string(),
            ],
        })
        .collect();

    let header = ["No", "Name", "Completed", "Actions"];
    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let [no_w, name_w, status_w, _] = widths;
    let mut line = |cells: [&str; 4]| {
        let [no, name, status, actions] = cells;
        let text = format!("{no:<no_w$}  {name:<name_w$}  {status:<status_w$}  {actions}");
        out.push_str(text.trim_end());
        out.push('\n');
    };

    line(header);
    let rules = widths.map(|w| "-".repeat(w));
    line([&rules[0], &rules[1], &rules[2], &rules[3]]);
    for row in &rows {
        line([&row[0], &row[1], &row[2], &row[3]]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{Task, TaskDraft, TaskId};
    use crate::view::EditSession;

    fn task(id: &str, title: &str, completed: bool) -> Task {
        Task { id: TaskId::new(id), title: title.into(), completed }
    }

    #[test]
    fn empty_list_shows_message_and_placeholder() {
        let text = render(&ViewSnapshot::default());
        assert!(text.contains(INPUT_PLACEHOLDER));
        assert!(text.contains(EMPTY_MESSAGE));
        assert!(!text.contains("Completed"));
    }

    #[test]
    fn loading_hides_table() {
        let snapshot = ViewSnapshot {
            tasks: vec![task("1", "Task A", false)],
            is_loading: true,
            ..ViewSnapshot::default()
        };
        let text = render(&snapshot);
        assert!(text.contains(LOADING_MESSAGE));
        assert!(!text.contains("Task A"));
    }

    #[test]
    fn table_lists_rows_with_status_labels() {
        let snapshot = ViewSnapshot {
            tasks: vec![task("1", "Task A", false), task("2", "Longer task B", true)],
            draft_title: "next".into(),
            ..ViewSnapshot::default()
        };
        let text = render(&snapshot);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[ next ]  + Add Todo");
        assert_eq!(lines[2], "No  Name           Completed  Actions");
        assert_eq!(lines[4], "1   Task A         Pending    edit | delete");
        assert_eq!(lines[5], "2   Longer task B  Complete   edit | delete");
    }

    #[test]
    fn editing_row_shows_draft_values() {
        let snapshot = ViewSnapshot {
            tasks: vec![task("1", "Task A", false)],
            editing: Some(EditSession {
                index: 0,
                id: TaskId::new("1"),
                draft: TaskDraft { title: "Task A2".into(), completed: true },
            }),
            ..ViewSnapshot::default()
        };
        let text = render(&snapshot);
        assert!(text.contains("[Task A2]"));
        assert!(text.contains("[Complete]"));
        assert!(text.contains("save | cancel | delete"));
    }
}
