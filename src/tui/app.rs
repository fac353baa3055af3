//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the task list, and coordinates the modal
//! dialogs for adding, editing, and deleting tasks.

use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::storage::FileStorage;
use crate::store::{validate_text, StoreError, TaskList, MIN_TEXT_LEN};
use crate::task::TaskId;
use crate::tui::{
    colors::{DARK_RED, DIM_GREY, GOLD},
    enums::{AppState, InputMode},
    input::InputField,
    utils::centered_rect,
};

/// Main application state for the terminal user interface.
///
/// While a dialog state is open the list cannot be mutated; the pending
/// operation resolves or cancels before anything else runs.
pub struct App {
    state: AppState,
    list: TaskList<FileStorage>,
    list_state: ListState,
    input: InputField,
    input_error: Option<String>,
    input_mode: InputMode,
    editing_task: Option<TaskId>,
    confirm_delete: Option<TaskId>,
    status_message: String,
}

impl App {
    /// Create a new App instance, loading the store from `db_dir`.
    pub fn new(db_dir: &Path) -> Self {
        let list = TaskList::open(FileStorage::new(db_dir));
        let mut list_state = ListState::default();
        if !list.is_empty() {
            list_state.select(Some(0));
        }
        App {
            state: AppState::TaskList,
            list,
            list_state,
            input: InputField::new(),
            input_error: None,
            input_mode: InputMode::None,
            editing_task: None,
            confirm_delete: None,
            status_message: String::new(),
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Id of the task under the cursor.
    fn selected_id(&self) -> Option<TaskId> {
        self.list_state
            .selected()
            .and_then(|idx| self.list.tasks().get(idx))
            .map(|t| t.id)
    }

    /// Clamp the selection after the list shrank.
    fn fix_selection(&mut self) {
        let len = self.list.len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(idx) if idx >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Up => {
                if let Some(selected) = self.list_state.selected() {
                    if selected > 0 {
                        self.list_state.select(Some(selected - 1));
                    }
                } else if !self.list.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.list_state.selected() {
                    if selected + 1 < self.list.len() {
                        self.list_state.select(Some(selected + 1));
                    }
                } else if !self.list.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Char('a') => {
                self.input = InputField::new();
                self.input_error = None;
                self.editing_task = None;
                self.state = AppState::AddTask;
                self.input_mode = InputMode::Text;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    if let Some(task) = self.list.get(id) {
                        self.input = InputField::with_value(&task.text);
                        self.input_error = None;
                        self.editing_task = Some(id);
                        self.state = AppState::EditTask;
                        self.input_mode = InputMode::Text;
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.confirm_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(id) = self.selected_id() {
                    match self.list.toggle(id) {
                        Ok(completed) => self.set_status_message(format!(
                            "Task {} marked {}",
                            id,
                            if completed { "done" } else { "open" }
                        )),
                        Err(e) => self.set_status_message(format!("Error saving: {e}")),
                    }
                }
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the add/edit text dialog.
    ///
    /// Validation happens here, inside the dialog: a too-short submission
    /// keeps the dialog open with an error line instead of dismissing it.
    fn handle_input_dialog(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.input_mode = InputMode::None;
                self.editing_task = None;
            }
            KeyCode::Enter => match validate_text(&self.input.value) {
                Err(_) => {
                    self.input_error = Some(format!(
                        "Please enter at least {MIN_TEXT_LEN} characters."
                    ));
                }
                Ok(_) => {
                    let result = match self.editing_task.take() {
                        Some(id) => self.list.set_text(id, &self.input.value).map(|()| {
                            self.set_status_message("Task updated".to_string());
                        }),
                        None => self.list.add(&self.input.value).map(|id| {
                            self.set_status_message(format!("Task {id} added"));
                        }),
                    };
                    match result {
                        Ok(()) => {
                            self.state = AppState::TaskList;
                            self.input_mode = InputMode::None;
                            self.fix_selection();
                        }
                        Err(StoreError::NotFound(_)) => {
                            // The task vanished while the dialog was open.
                            self.state = AppState::TaskList;
                            self.input_mode = InputMode::None;
                        }
                        Err(e) => {
                            self.state = AppState::TaskList;
                            self.input_mode = InputMode::None;
                            self.set_status_message(format!("Error saving: {e}"));
                        }
                    }
                }
            },
            KeyCode::Backspace => {
                if modifiers.contains(KeyModifiers::CONTROL) {
                    self.input.clear();
                } else {
                    self.input.handle_backspace();
                }
                self.input_error = None;
            }
            KeyCode::Delete => {
                self.input.handle_delete();
                self.input_error = None;
            }
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Char(c) => {
                self.input.handle_char(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the delete confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(id) = self.confirm_delete.take() {
                    match self.list.remove(id) {
                        Ok(Some(_)) => self.set_status_message("Task deleted".to_string()),
                        Ok(None) => {}
                        Err(e) => self.set_status_message(format!("Error deleting task: {e}")),
                    }
                    self.fix_selection();
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Poll for and dispatch one input event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            match self.state {
                AppState::TaskList => {
                    return Ok(self.handle_task_list_input(key.code, key.modifiers))
                }
                AppState::AddTask | AppState::EditTask => {
                    self.handle_input_dialog(key.code, key.modifiers)
                }
                AppState::Confirm => self.handle_confirm_input(key.code),
                AppState::Help => {
                    self.state = AppState::TaskList;
                }
            }
        }
        Ok(false)
    }

    /// Render the task list view.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .list
            .tasks()
            .iter()
            .map(|t| {
                let marker = if t.completed { "[x] " } else { "[ ] " };
                let style = if t.completed {
                    Style::default()
                        .fg(DIM_GREY)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<5}", t.id), Style::default().fg(GOLD)),
                    Span::raw(marker),
                    Span::styled(t.text.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Tasks"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    /// Render the add/edit input dialog over the task list.
    fn render_input_dialog(&mut self, f: &mut Frame, area: Rect) {
        let title = if self.editing_task.is_some() {
            "Edit Task"
        } else {
            "Add Task"
        };
        let dialog = centered_rect(60, 30, area);
        f.render_widget(Clear, dialog);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(dialog);

        let input = Paragraph::new(self.input.value.as_str())
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, chunks[0]);

        if let Some(err) = &self.input_error {
            let error = Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red));
            f.render_widget(error, chunks[1]);
        }

        let hint = Paragraph::new("Enter to save  Esc to cancel  Ctrl+Backspace to clear")
            .alignment(Alignment::Center)
            .style(Style::default().fg(DIM_GREY));
        f.render_widget(hint, chunks[2]);

        if self.input_mode == InputMode::Text {
            f.set_cursor_position((
                chunks[0].x + 1 + self.input.value[..self.input.cursor].chars().count() as u16,
                chunks[0].y + 1,
            ));
        }
    }

    /// Render a confirmation dialog for deletes.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let task_text = self
            .confirm_delete
            .and_then(|id| self.list.get(id))
            .map(|t| t.text.clone())
            .unwrap_or_default();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(task_text),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the help screen.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let text = vec![
            Line::from(""),
            Line::from("  Up/Down      select task"),
            Line::from("  a            add task"),
            Line::from("  e / Enter    edit task"),
            Line::from("  Space / c    toggle completion"),
            Line::from("  d            delete task (with confirmation)"),
            Line::from("  h            this help"),
            Line::from("  q / Esc      quit"),
            Line::from(""),
            Line::from("  Press any key to return."),
        ];
        let help = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.list.len())
                }
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask | AppState::EditTask => {
                self.render_task_list(f, chunks[0]);
                self.render_input_dialog(f, chunks[0]);
            }
            AppState::Confirm => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
