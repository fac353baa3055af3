//! Task data structure.
//!
//! This module defines the `Task` struct, the single record type the store
//! manages: an opaque id, the display text, and a completion flag.

use serde::{Deserialize, Serialize};

/// Opaque unique identifier for a task, assigned at creation and immutable.
pub type TaskId = u64;

/// A single task list entry.
///
/// The id joins the in-memory record to its rendered element. Ordering is
/// insertion order and lives in the containing collection, not in the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a fresh, incomplete task. `text` is stored as given; callers
    /// are responsible for trimming and validating first.
    pub fn new(id: TaskId, text: String) -> Self {
        Task {
            id,
            text,
            completed: false,
        }
    }
}
