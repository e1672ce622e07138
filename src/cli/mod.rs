//! CLI module for modtrack
//!
//! Provides command-line interface for:
//! - init: Create or migrate the item database
//! - serve: Boot the store and serve the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
