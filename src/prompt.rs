//! User-facing dialog service.
//!
//! The controller never talks to the terminal directly; it asks a `Prompter`
//! to confirm destructive actions, to collect replacement text, and to
//! surface outcome notifications. The prompt methods block until the user
//! answers, which is what keeps mutations strictly sequential.

use std::io::{self, BufRead, Write};

/// Kind of outcome notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Error,
}

/// Blocking dialog service consumed by the controller.
pub trait Prompter {
    /// Yes/no question. `false` on decline or dismissal.
    fn confirm(&mut self, message: &str) -> bool;

    /// Text input pre-filled with `initial`. The prompt itself re-asks while
    /// `validate` rejects the candidate; `None` means the user cancelled.
    fn prompt_text(
        &mut self,
        message: &str,
        initial: &str,
        validate: &dyn Fn(&str) -> bool,
    ) -> Option<String>;

    /// Fire-and-forget outcome notification.
    fn notify(&mut self, kind: Notice, message: &str);
}

/// Line-oriented prompter over stdin/stdout for the CLI.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl ConsolePrompter {
    pub fn new() -> Self {
        ConsolePrompter
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None, // EOF counts as cancel
            Ok(_) => Some(line.trim_end().to_string()),
            Err(e) => {
                eprintln!("Error reading input: {e}");
                None
            }
        }
    }
}

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        let _ = io::stdout().flush();
        match self.read_line() {
            Some(answer) => matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"),
            None => false,
        }
    }

    fn prompt_text(
        &mut self,
        message: &str,
        initial: &str,
        validate: &dyn Fn(&str) -> bool,
    ) -> Option<String> {
        println!("{message} (current: {initial}, empty line cancels)");
        loop {
            print!("> ");
            let _ = io::stdout().flush();
            let line = self.read_line()?;
            if line.trim().is_empty() {
                return None;
            }
            if validate(&line) {
                return Some(line);
            }
            println!("Please enter at least 3 characters.");
        }
    }

    fn notify(&mut self, kind: Notice, message: &str) {
        match kind {
            Notice::Success => println!("{message}"),
            Notice::Error => eprintln!("{message}"),
        }
    }
}
