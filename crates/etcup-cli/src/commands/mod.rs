//! Command implementations for etcup-cli

pub mod reconcile;

pub use reconcile::{ReconcileArgs, run_reconcile};
