//! # taskflow - task list manager
//!
//! A minimal task list manager: add, edit, toggle-complete, and delete short
//! text tasks, with state persisted to a local JSON store.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! taskflow add "Buy milk"
//!
//! # List tasks
//! taskflow list
//!
//! # Flip completion
//! taskflow toggle 1
//!
//! # Edit interactively (or pass --text)
//! taskflow edit 1
//!
//! # Delete with confirmation (or pass --yes)
//! taskflow delete 1
//!
//! # Launch the interactive UI
//! taskflow ui
//! ```
//!
//! Data is stored locally in `~/.taskflow/tasks.json`; pass `--db <dir>` to
//! use a different directory.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod controller;
pub mod prompt;
pub mod render;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;

fn main() {
    let cli = Cli::parse();

    // Completions need no store at all.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let db_dir = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskflow");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir
    });

    match cli.command {
        Commands::Add { text } => cmd_add(&db_dir, text),
        Commands::List => cmd_list(&db_dir),
        Commands::Toggle { id } => cmd_toggle(&db_dir, id),
        Commands::Edit { id, text } => cmd_edit(&db_dir, id, text),
        Commands::Delete { id, yes } => cmd_delete(&db_dir, id, yes),
        Commands::Ui => cmd_ui(&db_dir),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
