//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
///
/// Dialog states are modal: while one is open, list input is suspended and
/// nothing mutates until the dialog resolves.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Confirm,
    Help,
}

/// Input mode for text entry fields.
#[derive(Clone, Copy, PartialEq)]
pub enum InputMode {
    None,
    Text,
}
