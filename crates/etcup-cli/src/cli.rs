//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// etcup - Reconcile staged configuration file updates
///
/// Finds `._cfg<N>_<name>` files left next to protected configuration files
/// and lets you replace, discard or merge each of them.
#[derive(Parser, Debug)]
#[command(name = "etcup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory treated as `/`
    #[arg(long, env = "ETCUP_ROOT", default_value = "/")]
    pub root: PathBuf,

    /// Protected path to scan, relative to the root (repeatable).
    /// Defaults to CONFIG_PROTECT from etc/profile.env plus /etc.
    #[arg(short, long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Path whose updates are installed without asking (repeatable)
    #[arg(short, long = "mask", value_name = "PATH")]
    pub masks: Vec<String>,

    /// Suppress progress messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Replace every original with its updates, without prompting
    #[arg(long, conflicts_with = "discard_all")]
    pub automerge_all: bool,

    /// Delete every update and keep the originals, without prompting
    #[arg(long)]
    pub discard_all: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
