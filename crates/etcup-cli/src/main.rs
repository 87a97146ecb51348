//! etcup CLI
//!
//! Interactive resolution of staged configuration file updates.

mod cli;
mod commands;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::ReconcileArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let args = ReconcileArgs {
        root: cli.root,
        paths: cli.paths,
        masks: cli.masks,
        quiet: cli.quiet,
        automerge_all: cli.automerge_all,
        discard_all: cli.discard_all,
        json: cli.json,
    };
    tracing::debug!(?args, "Starting reconcile");
    commands::run_reconcile(&args)
}

/// Diagnostics go to stderr; `-v` forces debug, otherwise `RUST_LOG`
/// applies with warnings as the default.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
}
