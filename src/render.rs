//! List rendering contract and the plain-terminal renderer.
//!
//! The controller projects each task into a `TaskView` and hands the whole
//! ordered sequence over on every mutation; renderers replace their previous
//! output wholesale rather than patching it.

use crate::task::{Task, TaskId};

/// Display projection of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: TaskId,
    pub text: String,
    /// Drawn struck-through/checked when set.
    pub completed: bool,
}

impl From<&Task> for TaskView {
    fn from(t: &Task) -> Self {
        TaskView {
            id: t.id,
            text: t.text.clone(),
            completed: t.completed,
        }
    }
}

/// Consumes the full projected list each time state changes.
pub trait Renderer {
    fn render(&mut self, tasks: &[TaskView]);
}

/// Fixed-width table on stdout.
#[derive(Debug, Default)]
pub struct TableRenderer;

impl TableRenderer {
    pub fn new() -> Self {
        TableRenderer
    }
}

impl Renderer for TableRenderer {
    fn render(&mut self, tasks: &[TaskView]) {
        if tasks.is_empty() {
            println!("No tasks.");
            return;
        }
        println!("{:<5} {:<6} {}", "ID", "Done", "Text");
        for t in tasks {
            let done = if t.completed { "[x]" } else { "[ ]" };
            println!("{:<5} {:<6} {}", t.id, done, t.text);
        }
    }
}
