//! Operator interaction channel
//!
//! The controller never touches a terminal. It describes each prompt as a
//! [`Menu`] and hands it to an [`Operator`], which returns the chosen
//! number. The CLI implements this on top of the terminal; tests and batch
//! callers use [`ScriptedOperator`].

use std::collections::VecDeque;

use crate::{Error, Result};

/// Kind of message shown to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Success,
    Warning,
}

/// One selectable line of a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: i64,
    pub label: String,
}

impl MenuEntry {
    pub fn new(key: i64, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }
}

/// A numbered prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    /// Text printed above the entries
    pub header: String,
    /// Numbered items (files, candidates or actions)
    pub entries: Vec<MenuEntry>,
    /// Special choices listed after the items, such as `-1` to exit
    pub footer: Vec<MenuEntry>,
    /// The question asked on the input line
    pub prompt: String,
}

impl Menu {
    /// Whether `choice` is one of the listed keys.
    pub fn offers(&self, choice: i64) -> bool {
        self.entries
            .iter()
            .chain(self.footer.iter())
            .any(|entry| entry.key == choice)
    }
}

/// The person (or script) resolving updates
pub trait Operator {
    /// Show a progress, success or warning message.
    fn notify(&mut self, notice: Notice, message: &str);

    /// Show `menu` and return the number entered.
    ///
    /// # Errors
    ///
    /// Non-numeric input is [`Error::InvalidInput`]; a closed input channel
    /// is [`Error::InputClosed`].
    fn select(&mut self, menu: &Menu) -> Result<i64>;

    /// Ask a yes/no question. Only `yes` and `y` count as yes.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Clear the screen before a file list, when configured.
    fn clear_screen(&mut self) {}
}

/// Parse one line of operator input as a menu choice.
pub fn parse_selection(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    trimmed.parse::<i64>().map_err(|_| Error::InvalidInput {
        input: trimmed.to_string(),
    })
}

/// Interpret a yes/no answer.
pub fn parse_confirmation(input: &str) -> bool {
    matches!(input.trim(), "yes" | "y")
}

/// Operator that answers from a fixed list of responses.
///
/// Every menu, question and notice is recorded so tests can assert on what
/// the operator was shown.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    responses: VecDeque<String>,
    menus: Vec<Menu>,
    questions: Vec<String>,
    notices: Vec<(Notice, String)>,
}

impl ScriptedOperator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Menus shown so far, in order.
    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    /// Yes/no questions asked so far.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// All notices received.
    pub fn notices(&self) -> &[(Notice, String)] {
        &self.notices
    }

    /// Warning messages received.
    pub fn warnings(&self) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(notice, _)| *notice == Notice::Warning)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }

    fn next_response(&mut self) -> Result<String> {
        self.responses.pop_front().ok_or(Error::InputClosed)
    }
}

impl Operator for ScriptedOperator {
    fn notify(&mut self, notice: Notice, message: &str) {
        self.notices.push((notice, message.to_string()));
    }

    fn select(&mut self, menu: &Menu) -> Result<i64> {
        self.menus.push(menu.clone());
        let response = self.next_response()?;
        parse_selection(&response)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.questions.push(question.to_string());
        let response = self.next_response()?;
        Ok(parse_confirmation(&response))
    }
}
