//! Task collection, validation, and persistence.
//!
//! `TaskList` owns the ordered collection of tasks and is the only place that
//! mutates it. Every mutation serializes the whole collection back to storage
//! under a single fixed key; there is no incremental diffing.

use std::fmt;
use std::io;

use crate::storage::Storage;
use crate::task::{Task, TaskId};

/// Fixed storage key for the serialized collection.
pub const STORAGE_KEY: &str = "tasks";

/// Minimum trimmed text length accepted by add and edit.
pub const MIN_TEXT_LEN: usize = 3;

/// Errors produced by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Trimmed text was empty or shorter than [`MIN_TEXT_LEN`].
    TextTooShort,
    /// No task with the given id. Callers generally treat this as a no-op.
    NotFound(TaskId),
    /// The storage backend failed to persist.
    Storage(io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::TextTooShort => write!(
                f,
                "task text must be at least {MIN_TEXT_LEN} characters"
            ),
            StoreError::NotFound(id) => write!(f, "task {id} not found"),
            StoreError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Storage(e)
    }
}

/// Allocates task ids. Injectable so identity generation is deterministic
/// and testable.
pub trait IdAllocator {
    fn next_id(&mut self) -> TaskId;

    /// Ensure future ids are strictly greater than `id`. Called after load
    /// so fresh ids never collide with persisted ones.
    fn reserve_through(&mut self, id: TaskId);
}

/// Monotonic counter allocator, the default.
#[derive(Debug, Default)]
pub struct SequentialIds {
    last: TaskId,
}

impl SequentialIds {
    pub fn new() -> Self {
        SequentialIds::default()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        self.last += 1;
        self.last
    }

    fn reserve_through(&mut self, id: TaskId) {
        if id > self.last {
            self.last = id;
        }
    }
}

/// Validate raw user text: trim it, require at least [`MIN_TEXT_LEN`]
/// characters, and return the trimmed form.
pub fn validate_text(raw: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_TEXT_LEN {
        return Err(StoreError::TextTooShort);
    }
    Ok(trimmed.to_string())
}

/// Ordered task collection bound to a storage backend.
pub struct TaskList<S: Storage> {
    tasks: Vec<Task>,
    storage: S,
    ids: SequentialIds,
}

impl<S: Storage> TaskList<S> {
    /// Create an empty list over `storage`. Call [`TaskList::load`] to pull
    /// in any previously persisted state.
    pub fn new(storage: S) -> Self {
        TaskList {
            tasks: Vec::new(),
            storage,
            ids: SequentialIds::new(),
        }
    }

    /// Convenience constructor: new list with prior state loaded.
    pub fn open(storage: S) -> Self {
        let mut list = TaskList::new(storage);
        list.load();
        list
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validate `raw` and append a fresh incomplete task. Returns the new
    /// task's id. No mutation happens on validation failure.
    pub fn add(&mut self, raw: &str) -> Result<TaskId, StoreError> {
        let text = validate_text(raw)?;
        let id = self.ids.next_id();
        self.tasks.push(Task::new(id, text));
        self.persist()?;
        Ok(id)
    }

    /// Overwrite the text of an existing task with validated input.
    pub fn set_text(&mut self, id: TaskId, raw: &str) -> Result<(), StoreError> {
        let text = validate_text(raw)?;
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.text = text;
        self.persist()?;
        Ok(())
    }

    /// Flip a task's completion flag. Returns the new value.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.persist()?;
        Ok(completed)
    }

    /// Remove a task, preserving the relative order of the rest. Returns the
    /// removed task, or `None` if the id is unknown.
    pub fn remove(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let task = self.tasks.remove(idx);
        self.persist()?;
        Ok(Some(task))
    }

    /// Serialize the whole collection under [`STORAGE_KEY`].
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&self.tasks)
            .map_err(|e| StoreError::Storage(io::Error::other(e)))?;
        self.storage.set(STORAGE_KEY, &data)?;
        Ok(())
    }

    /// Replace the in-memory collection with whatever the store holds.
    ///
    /// A missing key leaves the collection empty. A malformed value is
    /// logged and treated as empty rather than crashing; the broken payload
    /// stays on disk untouched until the next mutation overwrites it.
    pub fn load(&mut self) {
        let stored = match self.storage.get(STORAGE_KEY) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Error reading task store, starting fresh: {e}");
                None
            }
        };
        self.tasks = match stored.as_deref() {
            None => Vec::new(),
            Some(data) => match serde_json::from_str(data) {
                Ok(tasks) => tasks,
                Err(e) => {
                    eprintln!("Error parsing task store, starting fresh: {e}");
                    Vec::new()
                }
            },
        };
        for t in &self.tasks {
            self.ids.reserve_through(t.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn empty_list() -> TaskList<MemoryStorage> {
        TaskList::open(MemoryStorage::new())
    }

    #[test]
    fn add_rejects_short_text() {
        let mut list = empty_list();
        for raw in ["", "  ", "hi", " ab ", "\t x \n"] {
            assert!(matches!(list.add(raw), Err(StoreError::TextTooShort)));
            assert!(list.is_empty());
        }
    }

    #[test]
    fn add_trims_and_appends_incomplete_task() {
        let mut list = empty_list();
        let id = list.add("  Buy milk  ").unwrap();
        assert_eq!(list.len(), 1);
        let task = list.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut list = empty_list();
        let a = list.add("first task").unwrap();
        let b = list.add("second task").unwrap();
        let c = list.add("third task").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut list = empty_list();
        let id = list.add("flip me").unwrap();
        let before = list.get(id).unwrap().clone();
        assert!(list.toggle(id).unwrap());
        assert!(!list.toggle(id).unwrap());
        assert_eq!(list.get(id).unwrap(), &before);
    }

    #[test]
    fn toggle_missing_id_is_not_found() {
        let mut list = empty_list();
        assert!(matches!(list.toggle(99), Err(StoreError::NotFound(99))));
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut list = empty_list();
        let a = list.add("aaa").unwrap();
        let b = list.add("bbb").unwrap();
        let c = list.add("ccc").unwrap();
        let removed = list.remove(b).unwrap().unwrap();
        assert_eq!(removed.id, b);
        let ids: Vec<_> = list.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut list = empty_list();
        list.add("keep me").unwrap();
        assert!(list.remove(42).unwrap().is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn set_text_validates_and_trims() {
        let mut list = empty_list();
        let id = list.add("original").unwrap();
        assert!(matches!(
            list.set_text(id, " x "),
            Err(StoreError::TextTooShort)
        ));
        assert_eq!(list.get(id).unwrap().text, "original");
        list.set_text(id, "  updated text  ").unwrap();
        assert_eq!(list.get(id).unwrap().text, "updated text");
    }

    #[test]
    fn persist_then_load_round_trips() {
        let mut list = empty_list();
        list.add("one two three").unwrap();
        let toggled = list.add("second entry").unwrap();
        list.toggle(toggled).unwrap();
        let before: Vec<Task> = list.tasks().to_vec();

        let mut reloaded = TaskList::open(list.storage.clone());
        assert_eq!(reloaded.tasks(), before.as_slice());

        // Fresh ids from the reloaded list must not collide.
        let new_id = reloaded.add("post-reload task").unwrap();
        assert!(before.iter().all(|t| t.id != new_id));
    }

    #[test]
    fn load_with_empty_store_yields_empty_list() {
        let list = empty_list();
        assert!(list.is_empty());
    }

    #[test]
    fn load_with_malformed_payload_starts_fresh() {
        let storage = MemoryStorage::with_entry(STORAGE_KEY, "{not json!");
        let mut list = TaskList::open(storage);
        assert!(list.is_empty());
        // The store stays usable afterwards.
        list.add("recovered").unwrap();
        assert_eq!(list.len(), 1);
    }
}
