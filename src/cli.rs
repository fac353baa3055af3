use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task list manager.
/// Storage defaults to ~/.taskflow or a directory passed via --db.
#[derive(Parser)]
#[command(name = "taskflow", version, about = "Minimal task list manager")]
pub struct Cli {
    /// Directory holding the task store.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
