//! CLI argument definitions using clap
//!
//! Commands:
//! - modtrack init [--config <path>]
//! - modtrack serve [--config <path>] [--port <port>]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// modtrack - modification item tracker with issue-tracker sync endpoints
#[derive(Parser, Debug)]
#[command(name = "modtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or upgrade the item database
    Init {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Serve the HTTP API
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Command {
    /// Configuration file named on the command line, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Init { config } | Command::Serve { config, .. } => config.as_deref(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
