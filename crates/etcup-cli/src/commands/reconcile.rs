//! Reconcile command implementation
//!
//! Runs the engine against a root directory and prints a summary.

use std::path::PathBuf;

use colored::Colorize;

use etcup_core::{ReconcileReport, ReconciliationOptions, RunEnvironment};

use crate::error::{CliError, Result};
use crate::interactive::{Output, TerminalOperator};

/// Everything the reconcile command needs from the command line
#[derive(Debug, Clone, Default)]
pub struct ReconcileArgs {
    pub root: PathBuf,
    pub paths: Vec<String>,
    pub masks: Vec<String>,
    pub quiet: bool,
    pub automerge_all: bool,
    pub discard_all: bool,
    pub json: bool,
}

impl ReconcileArgs {
    fn options(&self) -> ReconciliationOptions {
        ReconciliationOptions {
            quiet: self.quiet,
            paths: self.paths.clone(),
            mask_paths: self.masks.clone(),
            automerge_all: self.automerge_all,
            discard_all: self.discard_all,
        }
    }
}

/// Run the reconcile command
pub fn run_reconcile(args: &ReconcileArgs) -> Result<()> {
    if !args.root.is_dir() {
        return Err(CliError::user(format!(
            "Root directory {} does not exist",
            args.root.display()
        )));
    }

    let output = if args.json { Output::Stderr } else { Output::Stdout };
    let mut operator = TerminalOperator::new(output);
    let env = RunEnvironment::from_process();

    let report = etcup_core::run(&args.root, args.options(), &env, &mut operator)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !args.quiet {
        print_summary(&report);
    }
    Ok(())
}

/// Print human-readable summary
fn print_summary(report: &ReconcileReport) {
    if report.is_noop() && report.unresolved.is_empty() {
        return;
    }

    println!();
    println!("{}", "Summary:".bold());
    let rows = [
        ("Replaced", &report.replaced),
        ("Merged", &report.merged),
        ("Discarded", &report.discarded),
        ("Masked", &report.masked),
        ("Identical", &report.trivial),
        ("Orphans removed", &report.orphans_removed),
    ];
    for (label, paths) in rows {
        if !paths.is_empty() {
            println!("  {}: {}", label.dimmed(), paths.len().to_string().cyan());
        }
    }

    if !report.unresolved.is_empty() {
        println!(
            "  {}: {}",
            "Unresolved".dimmed(),
            report.unresolved.len().to_string().yellow()
        );
        for path in &report.unresolved {
            println!("    {}", path.yellow());
        }
    }
}
