//! ftsync umbrella crate.
//!
//! Re-exports the core types at the root. Use feature flags to pull in
//! the PostgreSQL layer and the CLI handlers.

#![doc = include_str!("../README.md")]

pub use ftsync_core as core;
pub use ftsync_core::*;

#[cfg(feature = "pg")]
pub use ftsync_pg as pg;

#[cfg(feature = "cli")]
pub use ftsync_cli as cli;
