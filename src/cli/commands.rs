//! CLI command implementations

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{self, DEFAULT_LOG_FILTER};
use crate::rest_api::ItemService;
use crate::store::SqliteItemStore;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (optional, default "./modtrack.sqlite3")
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Bind host and port
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Log filter directive (optional, default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database_path() -> String {
    "./modtrack.sqlite3".to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            http: HttpServerConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the named file, or fall back to defaults when none was given
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        observability::parse_filter(&self.log_filter)?;

        Ok(())
    }

    /// Get database file as Path
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }
}

/// Main CLI entry point
///
/// Parses arguments, loads configuration, installs logging, then dispatches.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let config = Config::resolve(cli.command.config_path())?;
    observability::init_logging(&config.log_filter)?;
    run_command(cli.command, config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: Config) -> CliResult<()> {
    match cmd {
        Command::Init { .. } => init(&config),
        Command::Serve { port, .. } => serve(config, port),
    }
}

/// Create the database file if needed and migrate it to the current schema
pub fn init(config: &Config) -> CliResult<()> {
    let path = config.database_path();
    let store = SqliteItemStore::open(&path)?;
    let version = store.schema_version()?;

    tracing::info!(path = %path.display(), version, "database ready");

    let mut stdout = io::stdout();
    serde_json::to_writer(
        &mut stdout,
        &json!({
            "initialized": true,
            "database_path": config.database_path,
            "schema_version": version
        }),
    )?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Open the store and serve HTTP until shutdown
pub fn serve(config: Config, port: Option<u16>) -> CliResult<()> {
    let mut http = config.http.clone();
    if let Some(port) = port {
        if port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }
        http.port = port;
    }

    let store = SqliteItemStore::open(&config.database_path())?;
    let server = HttpServer::new(http, ItemService::new(store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}
