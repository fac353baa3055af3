//! Task store controller.
//!
//! Ties the collection to its collaborators: every user interaction comes in
//! through one of the flow methods (or the [`Action`] dispatch table), the
//! controller mutates the collection, re-renders, and persists. Dialogs are
//! blocking suspend points; nothing mutates until the prompter returns, so
//! mutations can never race each other.

use crate::prompt::{Notice, Prompter};
use crate::render::{Renderer, TaskView};
use crate::storage::Storage;
use crate::store::{validate_text, StoreError, TaskList, MIN_TEXT_LEN};
use crate::task::TaskId;

/// Interaction affordances a rendered task element exposes. The renderer
/// reports these back by kind and id; the controller maps them to flows
/// without knowing anything about element structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Complete,
    Edit,
    Delete,
}

/// Outcome of a controller flow, for callers that report exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State was mutated and persisted.
    Changed,
    /// The user declined or cancelled, or the id no longer exists.
    Unchanged,
    /// Input was rejected by validation.
    Rejected,
}

/// Mediates between the task list, the prompter, and the renderer.
pub struct Controller<S: Storage, P: Prompter, R: Renderer> {
    list: TaskList<S>,
    prompter: P,
    renderer: R,
}

impl<S: Storage, P: Prompter, R: Renderer> Controller<S, P, R> {
    /// Build a controller over an already-loaded list and render the initial
    /// state.
    pub fn new(list: TaskList<S>, prompter: P, renderer: R) -> Self {
        let mut c = Controller {
            list,
            prompter,
            renderer,
        };
        c.render();
        c
    }

    pub fn list(&self) -> &TaskList<S> {
        &self.list
    }

    /// Project the collection in order and hand it to the renderer. Pure with
    /// respect to task state; calling twice without a mutation in between
    /// renders the same thing.
    pub fn render(&mut self) {
        let views: Vec<TaskView> = self.list.tasks().iter().map(TaskView::from).collect();
        self.renderer.render(&views);
    }

    /// Route a renderer interaction event to the matching flow.
    pub fn dispatch(&mut self, action: Action, id: TaskId) -> Result<Outcome, StoreError> {
        match action {
            Action::Complete => self.toggle(id),
            Action::Edit => self.edit(id),
            Action::Delete => self.delete(id),
        }
    }

    /// Validated add. Rejection notifies the user and leaves state untouched.
    pub fn add(&mut self, raw: &str) -> Result<Outcome, StoreError> {
        match self.list.add(raw) {
            Ok(_) => {
                self.render();
                self.prompter
                    .notify(Notice::Success, "Task added.");
                Ok(Outcome::Changed)
            }
            Err(StoreError::TextTooShort) => {
                self.prompter.notify(
                    Notice::Error,
                    &format!("Please enter a valid task (at least {MIN_TEXT_LEN} characters)."),
                );
                Ok(Outcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    /// Confirm-then-delete. Unknown ids are a silent no-op; declining the
    /// confirmation leaves state untouched.
    pub fn delete(&mut self, id: TaskId) -> Result<Outcome, StoreError> {
        let Some(task) = self.list.get(id) else {
            return Ok(Outcome::Unchanged);
        };
        let message = format!("Delete task \"{}\"? This cannot be undone.", task.text);
        if !self.prompter.confirm(&message) {
            return Ok(Outcome::Unchanged);
        }
        self.list.remove(id)?;
        self.render();
        self.prompter.notify(Notice::Success, "Task deleted.");
        Ok(Outcome::Changed)
    }

    /// Edit via the text prompt, pre-filled with the current text. The prompt
    /// itself enforces the minimum length, so whatever comes back is already
    /// valid; cancelling changes nothing.
    pub fn edit(&mut self, id: TaskId) -> Result<Outcome, StoreError> {
        let Some(task) = self.list.get(id) else {
            return Ok(Outcome::Unchanged);
        };
        let current = task.text.clone();
        let accepted = self.prompter.prompt_text(
            "Edit your task",
            &current,
            &|candidate: &str| validate_text(candidate).is_ok(),
        );
        let Some(new_text) = accepted else {
            return Ok(Outcome::Unchanged);
        };
        match self.list.set_text(id, &new_text) {
            Ok(()) => {
                self.render();
                self.prompter.notify(Notice::Success, "Task updated.");
                Ok(Outcome::Changed)
            }
            // The list mutated under an open dialog; drop the edit.
            Err(StoreError::NotFound(_)) => Ok(Outcome::Unchanged),
            Err(e) => Err(e),
        }
    }

    /// Flip completion. No confirmation, no notification on the happy path.
    pub fn toggle(&mut self, id: TaskId) -> Result<Outcome, StoreError> {
        match self.list.toggle(id) {
            Ok(_) => {
                self.render();
                Ok(Outcome::Changed)
            }
            Err(StoreError::NotFound(_)) => Ok(Outcome::Unchanged),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    /// Prompter scripted with canned answers; records notifications.
    #[derive(Default)]
    struct ScriptedPrompter {
        confirm_answers: Vec<bool>,
        text_answers: Vec<Option<String>>,
        notices: Vec<(Notice, String)>,
    }

    impl ScriptedPrompter {
        fn confirming(answer: bool) -> Self {
            ScriptedPrompter {
                confirm_answers: vec![answer],
                ..Default::default()
            }
        }

        fn answering_text(answer: Option<&str>) -> Self {
            ScriptedPrompter {
                text_answers: vec![answer.map(str::to_string)],
                ..Default::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn confirm(&mut self, _message: &str) -> bool {
            self.confirm_answers.pop().unwrap_or(false)
        }

        fn prompt_text(
            &mut self,
            _message: &str,
            _initial: &str,
            validate: &dyn Fn(&str) -> bool,
        ) -> Option<String> {
            // Mirrors the real dialog: invalid scripted input is re-asked,
            // and with nothing left to offer the user cancels.
            while let Some(answer) = self.text_answers.pop() {
                match answer {
                    Some(text) if validate(&text) => return Some(text),
                    Some(_) => continue,
                    None => return None,
                }
            }
            None
        }

        fn notify(&mut self, kind: Notice, message: &str) {
            self.notices.push((kind, message.to_string()));
        }
    }

    /// Renderer that records every frame it is handed.
    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Vec<TaskView>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, tasks: &[TaskView]) {
            self.frames.push(tasks.to_vec());
        }
    }

    fn controller(
        prompter: ScriptedPrompter,
    ) -> Controller<MemoryStorage, ScriptedPrompter, RecordingRenderer> {
        Controller::new(
            TaskList::open(MemoryStorage::new()),
            prompter,
            RecordingRenderer::default(),
        )
    }

    #[test]
    fn add_rejection_notifies_error_and_leaves_state() {
        let mut c = controller(ScriptedPrompter::default());
        let frames_before = c.renderer.frames.len();
        assert_eq!(c.add("hi").unwrap(), Outcome::Rejected);
        assert!(c.list.is_empty());
        // No re-render on rejection.
        assert_eq!(c.renderer.frames.len(), frames_before);
        assert_eq!(c.prompter.notices.len(), 1);
        assert_eq!(c.prompter.notices[0].0, Notice::Error);
    }

    #[test]
    fn add_success_renders_and_notifies() {
        let mut c = controller(ScriptedPrompter::default());
        assert_eq!(c.add("Buy milk").unwrap(), Outcome::Changed);
        assert_eq!(c.list.len(), 1);
        let last = c.renderer.frames.last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].text, "Buy milk");
        assert!(!last[0].completed);
        assert_eq!(c.prompter.notices[0].0, Notice::Success);
    }

    #[test]
    fn delete_confirmed_removes_only_that_task() {
        let mut c = controller(ScriptedPrompter::confirming(true));
        c.add("first task").unwrap();
        c.add("second task").unwrap();
        c.add("third task").unwrap();
        let victim = c.list.tasks()[1].id;
        assert_eq!(c.delete(victim).unwrap(), Outcome::Changed);
        let texts: Vec<_> = c.list.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first task", "third task"]);
    }

    #[test]
    fn delete_declined_changes_nothing() {
        let mut c = controller(ScriptedPrompter::confirming(false));
        c.add("keep me around").unwrap();
        let id = c.list.tasks()[0].id;
        assert_eq!(c.delete(id).unwrap(), Outcome::Unchanged);
        assert_eq!(c.list.len(), 1);
    }

    #[test]
    fn delete_unknown_id_is_silent_noop() {
        let mut c = controller(ScriptedPrompter::confirming(true));
        c.add("only task").unwrap();
        assert_eq!(c.delete(999).unwrap(), Outcome::Unchanged);
        assert_eq!(c.list.len(), 1);
        // Confirmation is never even requested.
        assert_eq!(c.prompter.confirm_answers.len(), 1);
    }

    #[test]
    fn edit_confirmed_updates_text_only() {
        let mut c = controller(ScriptedPrompter::answering_text(Some("Buy oat milk")));
        c.add("Buy milk").unwrap();
        let id = c.list.tasks()[0].id;
        c.toggle(id).unwrap();
        assert_eq!(c.edit(id).unwrap(), Outcome::Changed);
        let task = c.list.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(task.completed);
    }

    #[test]
    fn edit_cancelled_changes_nothing() {
        let mut c = controller(ScriptedPrompter::answering_text(None));
        c.add("stay the same").unwrap();
        let id = c.list.tasks()[0].id;
        assert_eq!(c.edit(id).unwrap(), Outcome::Unchanged);
        assert_eq!(c.list.get(id).unwrap().text, "stay the same");
    }

    #[test]
    fn edit_prompt_rejects_short_candidates() {
        // Scripted answers pop from the back: "hi" first, then the valid one.
        let mut c = controller(ScriptedPrompter {
            text_answers: vec![Some("long enough".into()), Some("hi".into())],
            ..Default::default()
        });
        c.add("original text").unwrap();
        let id = c.list.tasks()[0].id;
        assert_eq!(c.edit(id).unwrap(), Outcome::Changed);
        assert_eq!(c.list.get(id).unwrap().text, "long enough");
    }

    #[test]
    fn toggle_needs_no_prompt_and_renders() {
        let mut c = controller(ScriptedPrompter::default());
        c.add("flip me over").unwrap();
        let id = c.list.tasks()[0].id;
        let frames_before = c.renderer.frames.len();
        assert_eq!(c.toggle(id).unwrap(), Outcome::Changed);
        assert!(c.list.get(id).unwrap().completed);
        assert_eq!(c.renderer.frames.len(), frames_before + 1);
        assert!(c.renderer.frames.last().unwrap()[0].completed);
    }

    #[test]
    fn dispatch_routes_affordances_to_flows() {
        let mut c = controller(ScriptedPrompter::confirming(true));
        c.add("dispatch target").unwrap();
        let id = c.list.tasks()[0].id;
        c.dispatch(Action::Complete, id).unwrap();
        assert!(c.list.get(id).unwrap().completed);
        c.dispatch(Action::Delete, id).unwrap();
        assert!(c.list.is_empty());
    }

    #[test]
    fn full_session_scenario() {
        let mut c = controller(ScriptedPrompter {
            confirm_answers: vec![true],
            text_answers: vec![Some("Buy oat milk".into())],
            ..Default::default()
        });

        assert_eq!(c.add("Buy milk").unwrap(), Outcome::Changed);
        assert_eq!(c.list.len(), 1);
        let id = c.list.tasks()[0].id;
        assert_eq!(c.list.tasks()[0].text, "Buy milk");
        assert!(!c.list.tasks()[0].completed);

        assert_eq!(c.add("hi").unwrap(), Outcome::Rejected);
        assert_eq!(c.list.len(), 1);

        c.toggle(id).unwrap();
        assert!(c.list.get(id).unwrap().completed);

        c.edit(id).unwrap();
        let task = c.list.get(id).unwrap();
        assert_eq!(task.text, "Buy oat milk");
        assert!(task.completed);

        c.delete(id).unwrap();
        assert!(c.list.is_empty());
    }
}
