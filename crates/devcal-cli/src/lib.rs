//! The `devcal` command-line harness.
//!
//! Replays JSON-lines method calls against the in-memory calendar store,
//! using the same facades a platform bridge would.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::Cli;
pub use error::{CliError, CliResult};
