//! Shared test utilities for the etcup workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`root`] — [`TestRoot`](root::TestRoot), a throwaway filesystem root
//!   with staged updates

pub mod root;

pub use root::TestRoot;
