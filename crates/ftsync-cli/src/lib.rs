//! # ftsync-cli
//!
//! Command-line tools for ftsync mapping files:
//! - `check`: validate every entity's search-vector declarations
//! - `mappings`: print the resolved mappings as JSON
//! - `ddl`: print the column and index statements
//! - `migrate`: apply those statements to a database

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Command};
