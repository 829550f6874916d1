//! Plain-text rendering of the visible task list.

use crate::api::TaskApi;
use crate::client::{LoadState, TaskListClient};
use crate::task::Task;

pub const LOADING_TEXT: &str = "Loading tasks...";
pub const LOAD_FAILED_TEXT: &str = "Failed to load tasks.";
pub const EMPTY_TEXT: &str = "No tasks.";

/// Render the filtered view, one task per line, followed by a summary.
pub fn render<A: TaskApi>(client: &TaskListClient<A>) -> String {
    if client.is_loading() {
        return format!("{LOADING_TEXT}\n");
    }

    let mut out = String::new();
    if client.load_state() == LoadState::Failed && client.tasks().is_empty() {
        out.push_str(LOAD_FAILED_TEXT);
        out.push('\n');
        return out;
    }

    let visible = client.visible();
    if visible.is_empty() {
        out.push_str(EMPTY_TEXT);
        out.push('\n');
    }

    let editing = client.editing().map(|s| &s.id);
    for task in visible {
        out.push_str(&render_task(task, editing == Some(&task.id)));
        out.push('\n');
    }

    let counts = client.counts();
    out.push_str(&format!("{} pending, {} completed\n", counts.pending, counts.completed));
    out
}

#[must_use]
pub fn render_task(task: &Task, editing: bool) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let mut line = format!("[{mark}] {}  {}", task.id, task.title);
    if editing {
        line.push_str("  (editing)");
    }
    line
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
