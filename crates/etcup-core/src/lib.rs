//! Reconciliation engine for staged configuration file updates
//!
//! Package managers do not overwrite protected configuration files. They
//! drop the new version next to the original as `._cfg<N>_<name>` and
//! leave the decision to the administrator. This crate finds those staged
//! files and resolves them:
//!
//! - **Scanning**: group staged files under the original they replace,
//!   deleting orphans
//! - **Masking**: install updates to protect-masked files without asking
//! - **Trivial updates**: drop updates identical to their original
//! - **Resolution**: menus for replace, discard, merge and diff, with
//!   "merge all" and "discard all" overrides
//!
//! # Architecture
//!
//! ```text
//!            etcup (CLI)
//!                |
//!            etcup-core
//!   config -> scan -> mask -> trivial -> controller -> executor
//!                |                                       |
//!            etcup-fs                        external diff/merge/pager
//! ```
//!
//! The engine never reads the terminal or the process environment. Prompts
//! go through an [`Operator`] and environment overrides arrive as a
//! [`RunEnvironment`].
//!
//! # Example
//!
//! ```no_run
//! use etcup_core::{ReconciliationOptions, RunEnvironment, ScriptedOperator};
//!
//! let mut operator = ScriptedOperator::new(["-7"]);
//! let report = etcup_core::run(
//!     std::path::Path::new("/"),
//!     ReconciliationOptions::default(),
//!     &RunEnvironment::from_process(),
//!     &mut operator,
//! )?;
//! println!("{} updates discarded", report.discarded.len());
//! # Ok::<(), etcup_core::Error>(())
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod mask;
pub mod matcher;
pub mod operator;
pub mod report;
pub mod run;
pub mod scan;
pub mod task;
pub mod trivial;

pub use config::{ProtectPaths, ReconciliationConfig, RunEnvironment};
pub use controller::ResolutionController;
pub use error::{Error, Result};
pub use executor::{ActionOutcome, MergeExecutor};
pub use mask::{apply_masking, is_masked};
pub use operator::{Menu, MenuEntry, Notice, Operator, ScriptedOperator};
pub use report::ReconcileReport;
pub use run::{NOTHING_LEFT, run};
pub use scan::{ScanOutcome, scan};
pub use task::{CandidateMap, ReconciliationOptions, ReconciliationTask};
pub use trivial::{TrivialResolution, apply_trivial};
