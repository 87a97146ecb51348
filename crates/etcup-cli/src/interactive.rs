//! Terminal operator for the resolution menus
//!
//! Reads answers with dialoguer when stdin is a terminal, and plain lines
//! otherwise so answers can be piped in.

use std::io::{BufRead, IsTerminal, Write};

use colored::Colorize;
use dialoguer::Input;
use etcup_core::operator::{parse_confirmation, parse_selection};
use etcup_core::{Menu, Notice, Operator};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Where menus and notices are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Stdout,
    /// Keeps stdout free for machine-readable output
    Stderr,
}

/// [`Operator`] backed by the process terminal
pub struct TerminalOperator {
    output: Output,
    interactive: bool,
}

impl TerminalOperator {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    fn emit(&self, text: &str) {
        match self.output {
            Output::Stdout => println!("{text}"),
            Output::Stderr => eprintln!("{text}"),
        }
    }

    fn read_answer(&mut self, prompt: &str) -> etcup_core::Result<String> {
        if self.interactive {
            return Input::<String>::new()
                .with_prompt(prompt.trim_end().trim_end_matches(':'))
                .allow_empty(true)
                .interact_text()
                .map_err(|e| etcup_core::Error::Io(std::io::Error::other(e)));
        }

        match self.output {
            Output::Stdout => {
                print!("{prompt}");
                std::io::stdout().flush()?;
            }
            Output::Stderr => {
                eprint!("{prompt}");
                std::io::stderr().flush()?;
            }
        }

        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(etcup_core::Error::InputClosed);
        }
        Ok(line)
    }
}

impl Operator for TerminalOperator {
    fn notify(&mut self, notice: Notice, message: &str) {
        let text = match notice {
            Notice::Info => message.to_string(),
            Notice::Success => format!("{} {}", "OK".green().bold(), message),
            Notice::Warning => format!("{}: {}", "warning".yellow().bold(), message),
        };
        self.emit(&text);
    }

    fn select(&mut self, menu: &Menu) -> etcup_core::Result<i64> {
        self.emit("");
        self.emit(&menu.header.bold().to_string());
        self.emit("");
        for entry in &menu.entries {
            self.emit(&format!("[{:>3}] {}", entry.key, entry.label.bold()));
        }
        if !menu.footer.is_empty() {
            self.emit("");
            for entry in &menu.footer {
                self.emit(&format!("[{:>3}] {}", entry.key, entry.label));
            }
        }
        self.emit("");

        let answer = self.read_answer(&menu.prompt)?;
        let choice = parse_selection(&answer)?;
        tracing::debug!(choice, "Menu selection");
        Ok(choice)
    }

    fn confirm(&mut self, question: &str) -> etcup_core::Result<bool> {
        let answer = self.read_answer(question)?;
        Ok(parse_confirmation(&answer))
    }

    fn clear_screen(&mut self) {
        match self.output {
            Output::Stdout => print!("{CLEAR_SCREEN}"),
            Output::Stderr => eprint!("{CLEAR_SCREEN}"),
        }
    }
}
