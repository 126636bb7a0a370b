//! Interactive password entry.
use std::io::{self, BufRead as _, IsTerminal as _, Write as _};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// Source of an interactively entered password.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordPrompt {
    /// Ask for and return a password.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read or the user aborts.
    fn read_password(&self) -> io::Result<String>;
}

/// Prompt on the controlling terminal without echoing input.
///
/// When stdin is not a terminal (e.g. piped), one line is read from it
/// instead.
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    label: String,
}

impl TerminalPrompt {
    /// Create a prompt that prints `label` before reading.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new("Password: ")
    }
}

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&self) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", self.label)?;
        stderr.flush()?;

        if !io::stdin().is_terminal() {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            return Ok(line.trim_end_matches(['\r', '\n']).to_string());
        }

        terminal::enable_raw_mode()?;
        let result = read_hidden_line();
        let restored = terminal::disable_raw_mode();
        writeln!(stderr)?;
        restored?;
        result
    }
}

/// Collect key presses until Enter, without echo. Raw mode must be active.
fn read_hidden_line() -> io::Result<String> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(password),
            KeyCode::Backspace => {
                password.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "password prompt interrupted",
                ));
            }
            KeyCode::Char(c) => password.push(c),
            _ => {}
        }
    }
}
