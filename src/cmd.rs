//! Command implementations for the CLI interface.
//!
//! Each handler loads the store, runs one flow against the console prompter,
//! and exits non-zero when the flow reports a failure worth signalling to
//! scripts. Interactive flows (edit prompt, delete confirmation) go through
//! the controller; `--text` and `--yes` shortcuts hit the list directly.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use std::path::Path;

use crate::cli::Cli;
use crate::controller::{Controller, Outcome};
use crate::prompt::ConsolePrompter;
use crate::render::{Renderer, TableRenderer, TaskView};
use crate::storage::FileStorage;
use crate::store::{StoreError, TaskList};
use crate::task::TaskId;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Task text, at least 3 characters after trimming.
        text: String,
    },

    /// List all tasks.
    List,

    /// Toggle a task's completion state.
    Toggle {
        /// Task ID.
        id: TaskId,
    },

    /// Edit a task's text.
    Edit {
        /// Task ID.
        id: TaskId,
        /// New text; omit to be prompted interactively.
        #[arg(long)]
        text: Option<String>,
    },

    /// Delete a task after confirmation.
    Delete {
        /// Task ID.
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Launch the interactive UI.
    Ui,

    /// Generate shell completions.
    Completions {
        /// Shell to generate for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Renderer that prints nothing. Mutating one-shot commands would otherwise
/// echo the whole table after every change; only `list` renders.
#[derive(Default)]
struct SilentRenderer;

impl Renderer for SilentRenderer {
    fn render(&mut self, _tasks: &[TaskView]) {}
}

fn open_list(db_dir: &Path) -> TaskList<FileStorage> {
    TaskList::open(FileStorage::new(db_dir))
}

fn open_controller(db_dir: &Path) -> Controller<FileStorage, ConsolePrompter, SilentRenderer> {
    Controller::new(open_list(db_dir), ConsolePrompter::new(), SilentRenderer)
}

fn exit_for(outcome: Result<Outcome, StoreError>) {
    match outcome {
        Ok(Outcome::Changed) | Ok(Outcome::Unchanged) => {}
        Ok(Outcome::Rejected) => std::process::exit(1),
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

pub fn cmd_add(db_dir: &Path, text: String) {
    let mut controller = open_controller(db_dir);
    exit_for(controller.add(&text));
}

pub fn cmd_list(db_dir: &Path) {
    let list = open_list(db_dir);
    let views: Vec<TaskView> = list.tasks().iter().map(TaskView::from).collect();
    TableRenderer::new().render(&views);
}

pub fn cmd_toggle(db_dir: &Path, id: TaskId) {
    let mut list = open_list(db_dir);
    match list.toggle(id) {
        Ok(completed) => {
            println!("Task {id} marked {}.", if completed { "done" } else { "open" })
        }
        Err(StoreError::NotFound(_)) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

pub fn cmd_edit(db_dir: &Path, id: TaskId, text: Option<String>) {
    match text {
        Some(new_text) => {
            let mut list = open_list(db_dir);
            match list.set_text(id, &new_text) {
                Ok(()) => println!("Task updated."),
                Err(e @ StoreError::TextTooShort) | Err(e @ StoreError::NotFound(_)) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Failed to save tasks: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            let mut controller = open_controller(db_dir);
            if controller.list().get(id).is_none() {
                eprintln!("Task {id} not found.");
                std::process::exit(1);
            }
            exit_for(controller.edit(id));
        }
    }
}

pub fn cmd_delete(db_dir: &Path, id: TaskId, yes: bool) {
    if yes {
        let mut list = open_list(db_dir);
        match list.remove(id) {
            Ok(Some(_)) => println!("Task deleted."),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Failed to save tasks: {e}");
                std::process::exit(1);
            }
        }
        return;
    }
    let mut controller = open_controller(db_dir);
    exit_for(controller.delete(id));
}

pub fn cmd_ui(db_dir: &Path) {
    if let Err(e) = run_tui(db_dir) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
