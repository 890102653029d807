// Terminal seam for the UI layer. The menu only talks to a `Console`, so
// the same flow runs against the real terminal (dialoguer prompts,
// crossterm colors, indicatif spinners) or against a scripted console in
// tests.

use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

/// How a status line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Failure,
    Warning,
    Info,
}

pub trait Console {
    /// Read one line of input. Surrounding whitespace is trimmed.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Read one line without echoing it.
    fn read_secret(&mut self, prompt: &str) -> Result<String>;

    /// Print plain text.
    fn line(&mut self, text: &str);

    /// Print a status line.
    fn notice(&mut self, kind: Notice, text: &str);

    /// Spinner shown while a request is in flight.
    fn spinner(&self, message: &str) -> ProgressBar {
        let _ = message;
        ProgressBar::hidden()
    }
}

/// The real terminal. Uses dialoguer prompts when stdin is interactive and
/// plain line reads when it is piped.
pub struct TerminalConsole {
    interactive: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_plain(&self, prompt: &str) -> Result<String> {
        print!("{}: ", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut buf = String::new();
        let read = io::stdin().lock().read_line(&mut buf).context("Failed to read stdin")?;
        if read == 0 {
            anyhow::bail!("standard input closed");
        }
        Ok(buf.trim().to_string())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        if !self.interactive {
            return self.read_plain(prompt);
        }
        let value: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;
        Ok(value.trim().to_string())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        if !self.interactive {
            return self.read_plain(prompt);
        }
        let value = Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .context("Failed to read input")?;
        Ok(value.trim().to_string())
    }

    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn notice(&mut self, kind: Notice, text: &str) {
        match kind {
            Notice::Success => println!("{}", format!("✅ {}", text).green()),
            Notice::Failure => println!("{}", format!("❌ {}", text).red()),
            Notice::Warning => println!("{}", format!("⚠️  {}", text).yellow()),
            Notice::Info => println!("{}", text.cyan()),
        }
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
