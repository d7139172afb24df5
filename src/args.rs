//! These structs provide the CLI interface for the sales-board program.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// sales-board: serves monthly sales statistics for a product transaction dataset.
///
/// The program loads a fixed dataset of product sale transactions into a local SQLite record
/// store and exposes read-only JSON endpoints over HTTP: a searchable, paginated transaction
/// listing and, for any calendar month, sales statistics, a price histogram and a category
/// breakdown.
///
/// Settings can be given as flags, as environment variables (a `.env` file in the working
/// directory is read at startup), or in a JSON file passed with --config. Flags and environment
/// variables take precedence over the file.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP service.
    ///
    /// The record store is opened at startup and closed when the service receives Ctrl-C or
    /// SIGTERM. The dataset is not loaded automatically; call GET /initialize (or run the
    /// `initialize` subcommand) to fill the store.
    Serve,
    /// Replace the contents of the record store with the remote dataset and exit.
    Initialize,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Path to an optional JSON configuration file.
    #[arg(long, env = "SALES_BOARD_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite connection string for the record store, e.g. sqlite:sales.sqlite
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// URL of the JSON dataset loaded by /initialize.
    #[arg(long, env = "DATASET_URL")]
    dataset_url: Option<String>,

    /// Seconds to wait for the dataset download before giving up. Defaults to 30.
    #[arg(long, env = "FETCH_TIMEOUT_SECS")]
    fetch_timeout_secs: Option<u64>,

    /// Address to listen on. Defaults to 0.0.0.0.
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to listen on. Defaults to 5000.
    #[arg(long, env = "PORT")]
    port: Option<u16>,
}

impl Common {
    /// Creates `Common` with only a log level set; everything else falls back to the config file
    /// or the defaults.
    pub fn new(log_level: LevelFilter) -> Self {
        Self {
            log_level,
            config: None,
            database_url: None,
            dataset_url: None,
            fetch_timeout_secs: None,
            host: None,
            port: None,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn dataset_url(&self) -> Option<&str> {
        self.dataset_url.as_deref()
    }

    pub fn fetch_timeout_secs(&self) -> Option<u64> {
        self.fetch_timeout_secs
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}
