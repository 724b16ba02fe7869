use is_terminal::IsTerminal;
use std::io::{self, BufRead, Write};

use crate::error::{IoContext, Result};

/// Questions the environment selector may ask
///
/// Callers check [`Prompter::is_interactive`] first and never ask anything on
/// a non-interactive prompter, so piped runs can't block on input.
pub trait Prompter {
    fn is_interactive(&self) -> bool;

    /// Show a numbered menu and return the raw answer
    fn ask_choice(&mut self, question: &str, choices: &[&str]) -> Result<String>;

    fn ask_path(&mut self, question: &str) -> Result<String>;

    /// Yes/no question; empty input picks `default`
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// Reads answers line by line from stdin
pub struct TerminalPrompter {
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_line(&self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt}").io_context(|| "Failed to write prompt")?;
        stdout.flush().io_context(|| "Failed to write prompt")?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .io_context(|| "Failed to read answer from stdin")?;
        Ok(line.trim().to_string())
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn ask_choice(&mut self, question: &str, choices: &[&str]) -> Result<String> {
        let mut menu = format!("{question}\n");
        for (idx, choice) in choices.iter().enumerate() {
            menu.push_str(&format!("  {}) {choice}\n", idx + 1));
        }
        menu.push_str(&format!("Choice [1-{}] (default 1): ", choices.len()));
        self.read_line(&menu)
    }

    fn ask_path(&mut self, question: &str) -> Result<String> {
        self.read_line(&format!("{question}: "))
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.read_line(&format!("{question} {hint} "))?;
        Ok(parse_yes_no(&answer).unwrap_or(default))
    }
}

/// `None` for anything that isn't clearly yes or no
fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
