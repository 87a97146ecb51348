//! Operator-driven resolution of the remaining updates
//!
//! Three nested menus: the list of originals, the candidates of one
//! original, and the actions for one candidate. The bulk choices (`-3`
//! merge all, `-7` discard all) set a run-wide override that every later
//! file honours without prompting.

use etcup_fs::NormalizedPath;

use crate::executor::{ActionOutcome, MergeExecutor};
use crate::operator::{Menu, MenuEntry, Notice, Operator};
use crate::report::ReconcileReport;
use crate::task::ReconciliationTask;
use crate::{Error, Result};

pub const EXIT: i64 = -1;
pub const AUTOMERGE_ALL: i64 = -3;
pub const DISCARD_ALL: i64 = -7;

pub const ACTION_REPLACE: i64 = 1;
pub const ACTION_DISCARD: i64 = 2;
pub const ACTION_MERGE: i64 = 3;
pub const ACTION_DIFF: i64 = 4;

/// Drives a [`ReconciliationTask`] to completion (or until the operator
/// leaves) and records what happened.
pub struct ResolutionController<'a> {
    task: &'a mut ReconciliationTask,
    operator: &'a mut dyn Operator,
    executor: MergeExecutor,
    report: ReconcileReport,
}

impl<'a> ResolutionController<'a> {
    pub fn new(
        task: &'a mut ReconciliationTask,
        executor: MergeExecutor,
        operator: &'a mut dyn Operator,
    ) -> Self {
        Self {
            task,
            operator,
            executor,
            report: ReconcileReport::default(),
        }
    }

    /// Run the top-level menu until nothing is left or the operator exits.
    ///
    /// The returned report lists the candidates still unresolved.
    ///
    /// # Errors
    ///
    /// I/O failures and operator input errors end the run. Failing
    /// external tools only abort the action that ran them.
    pub fn run(mut self) -> Result<ReconcileReport> {
        if self.override_active() {
            self.resolve_all()?;
        }

        while !self.task.is_empty() {
            if self.task.config().clear_term {
                self.operator.clear_screen();
            }

            let originals = self.task.originals();
            let choice = self.operator.select(&files_menu(&originals))?;
            match choice {
                EXIT => break,
                AUTOMERGE_ALL => {
                    self.task.automerge_all = true;
                    self.resolve_all()?;
                }
                DISCARD_ALL => {
                    self.task.discard_all = true;
                    self.resolve_all()?;
                }
                _ => match pick(choice, &originals) {
                    Some(original) => self.process_file(original)?,
                    None => self.invalid(choice),
                },
            }
        }

        self.report.unresolved = self
            .task
            .iter()
            .flat_map(|(_, candidates)| ReconcileReport::paths(candidates))
            .collect();
        Ok(self.report)
    }

    fn override_active(&self) -> bool {
        self.task.automerge_all || self.task.discard_all
    }

    fn resolve_all(&mut self) -> Result<()> {
        for original in self.task.originals() {
            self.process_file(&original)?;
        }
        Ok(())
    }

    fn process_file(&mut self, original: &NormalizedPath) -> Result<()> {
        if !self.task.contains(original) {
            return Err(Error::invalid_state(format!("File {original} not found")));
        }

        if self.override_active() {
            let candidates = self.remaining(original);
            for candidate in &candidates {
                if self.task.discard_all {
                    self.discard(original, candidate)?;
                } else {
                    self.replace(original, candidate)?;
                }
            }
            return Ok(());
        }

        while self.task.contains(original) {
            let candidates = self.remaining(original);
            let choice = self.operator.select(&candidates_menu(original, &candidates))?;
            if choice == EXIT {
                break;
            }
            match pick(choice, &candidates) {
                Some(candidate) => self.process_candidate(original, candidate)?,
                None => self.invalid(choice),
            }
        }
        Ok(())
    }

    fn process_candidate(
        &mut self,
        original: &NormalizedPath,
        candidate: &NormalizedPath,
    ) -> Result<()> {
        let menu = actions_menu(candidate);
        loop {
            match self.operator.select(&menu)? {
                ACTION_REPLACE => return self.replace(original, candidate),
                ACTION_DISCARD => return self.discard(original, candidate),
                ACTION_MERGE => {
                    match self.executor.merge(original, candidate, &mut *self.operator) {
                        Ok(ActionOutcome::Resolved) => {
                            self.task.resolve_candidate(original, candidate);
                            self.report.merged.push(original.to_string());
                            return Ok(());
                        }
                        Ok(ActionOutcome::Unresolved) => return Ok(()),
                        Err(e) if e.is_recoverable() => self.action_failed(&e),
                        Err(e) => return Err(e),
                    }
                }
                ACTION_DIFF => match self.executor.show_diff(original, candidate) {
                    Ok(()) => {}
                    Err(e) if e.is_recoverable() => self.action_failed(&e),
                    Err(e) => return Err(e),
                },
                EXIT => return Ok(()),
                _ => {}
            }
        }
    }

    fn replace(&mut self, original: &NormalizedPath, candidate: &NormalizedPath) -> Result<()> {
        self.executor.replace(original, candidate, &mut *self.operator)?;
        self.task.resolve_candidate(original, candidate);
        self.report.replaced.push(original.to_string());
        Ok(())
    }

    fn discard(&mut self, original: &NormalizedPath, candidate: &NormalizedPath) -> Result<()> {
        self.executor.discard(candidate, &mut *self.operator)?;
        self.task.resolve_candidate(original, candidate);
        self.report.discarded.push(candidate.to_string());
        Ok(())
    }

    fn remaining(&self, original: &NormalizedPath) -> Vec<NormalizedPath> {
        self.task
            .candidates(original)
            .map(<[_]>::to_vec)
            .unwrap_or_default()
    }

    fn invalid(&mut self, choice: i64) {
        self.operator.notify(
            Notice::Warning,
            &format!("Value '{choice}' is not valid. Try again."),
        );
    }

    fn action_failed(&mut self, err: &Error) {
        tracing::warn!(error = %err, "External command failed");
        self.operator.notify(Notice::Warning, &err.to_string());
    }
}

/// Item for a 1-based menu choice.
fn pick<T>(choice: i64, items: &[T]) -> Option<&T> {
    let index = usize::try_from(choice).ok()?.checked_sub(1)?;
    items.get(index)
}

fn numbered<'p>(items: impl Iterator<Item = &'p str>) -> Vec<MenuEntry> {
    items
        .enumerate()
        .map(|(i, label)| MenuEntry::new(i as i64 + 1, label))
        .collect()
}

fn files_menu(originals: &[NormalizedPath]) -> Menu {
    Menu {
        header: "The following is the list of files which need updating, each\n\
                 configuration file is followed by a list of possible replacement files."
            .to_string(),
        entries: numbered(originals.iter().map(NormalizedPath::as_str)),
        footer: vec![
            MenuEntry::new(EXIT, "to exit"),
            MenuEntry::new(AUTOMERGE_ALL, "to auto merge all files"),
            MenuEntry::new(DISCARD_ALL, "to discard all updates"),
        ],
        prompt: "Please select a file to edit by entering the corresponding number.\n\
                 (don't use -3 or -7 if you're unsure what to do): "
            .to_string(),
    }
}

fn candidates_menu(original: &NormalizedPath, candidates: &[NormalizedPath]) -> Menu {
    Menu {
        header: format!("Below are the new config files for {original}:"),
        entries: numbered(
            candidates
                .iter()
                .map(|c| c.file_name().unwrap_or(c.as_str())),
        ),
        footer: vec![MenuEntry::new(EXIT, "to exit this file")],
        prompt: "Please select a file to process: ".to_string(),
    }
}

fn actions_menu(candidate: &NormalizedPath) -> Menu {
    Menu {
        header: format!("File: {candidate}"),
        entries: vec![
            MenuEntry::new(ACTION_REPLACE, "Replace original with update"),
            MenuEntry::new(ACTION_DISCARD, "Delete update, keeping original as is"),
            MenuEntry::new(ACTION_MERGE, "Interactively merge original with update"),
            MenuEntry::new(ACTION_DIFF, "Show differences"),
        ],
        footer: vec![MenuEntry::new(EXIT, "to ignore this update")],
        prompt: "Please select from the menu above: ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Some(&"a"))]
    #[case(2, Some(&"b"))]
    #[case(3, None)]
    #[case(0, None)]
    #[case(-5, None)]
    fn picks_one_based(#[case] choice: i64, #[case] expected: Option<&&str>) {
        assert_eq!(pick(choice, &["a", "b"]), expected);
    }

    #[test]
    fn files_menu_lists_bulk_choices() {
        let menu = files_menu(&[NormalizedPath::new("/etc/a")]);
        assert_eq!(menu.entries, vec![MenuEntry::new(1, "/etc/a")]);
        assert!(menu.offers(EXIT));
        assert!(menu.offers(AUTOMERGE_ALL));
        assert!(menu.offers(DISCARD_ALL));
    }

    #[test]
    fn candidates_menu_shows_file_names() {
        let menu = candidates_menu(
            &NormalizedPath::new("/etc/a"),
            &[NormalizedPath::new("/etc/._cfg0000_a")],
        );
        assert_eq!(menu.entries[0].label, "._cfg0000_a");
    }
}
