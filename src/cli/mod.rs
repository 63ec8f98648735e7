//! Command-line interface for connector-lib.
//!
//! The binary is a thin layer over the library: every command builds a
//! [`LibraryConfig`], calls the scanner or the pipeline, and prints the result
//! on stdout. Logs go to stderr so the output can be piped.
//!
//! # Commands
//!
//! - `resolve <DIR>` - resolve a whole connector library and print it
//! - `list <DIR>` - one line per connector with its platforms and category
//! - `show <FILE>` - resolve a single connector or template
//!
//! # Global options
//!
//! - `--verbose` / `--quiet` select the log level (`debug` / `error`, default
//!   `info`). `RUST_LOG` takes precedence when set.
//! - `--config <FILE>` reads a TOML [`LibraryConfig`].
//! - `--extension <EXT>` overrides the connector file extension.
//!
//! # Examples
//!
//! ```bash
//! connector-lib resolve ./connectors --format yaml
//! connector-lib --verbose resolve ./connectors --parallel
//! connector-lib list ./connectors --format json
//! connector-lib show ./connectors/snmp/MIB2.yaml
//! ```

mod common;
pub mod list;
pub mod resolve;
pub mod show;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::LibraryConfig;

/// Settings derived from the global command-line flags.
///
/// Kept separate from [`Cli`] so tests can build one without parsing
/// arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// TOML file holding the [`LibraryConfig`].
    pub config_path: Option<PathBuf>,

    /// Extension override applied on top of the loaded configuration.
    pub extension: Option<String>,
}

impl CliConfig {
    /// Installs the stderr log subscriber.
    ///
    /// Does nothing when a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Loads the library configuration and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but is invalid.
    pub async fn library_config(&self) -> Result<LibraryConfig> {
        let config = LibraryConfig::load_with_optional(self.config_path.clone()).await?;
        Ok(match &self.extension {
            Some(extension) => config.with_extension(extension.clone()),
            None => config,
        })
    }
}

/// Resolve, list and inspect YAML connector libraries.
#[derive(Parser, Debug)]
#[command(name = "connector-lib", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug details (equivalent to `RUST_LOG=debug`)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Library configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Connector file extension, overriding the configuration
    #[arg(long, global = true, value_name = "EXT")]
    extension: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve every connector of a library and print the result
    Resolve(resolve::ResolveCommand),

    /// List the connectors of a library
    List(list::ListCommand),

    /// Resolve a single connector or template file
    Show(show::ShowCommand),
}

impl Cli {
    /// Runs the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` renders it for the user.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
            extension: self.extension.clone(),
        }
    }

    /// Runs the parsed command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let library_config = config.library_config().await?;

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(library_config).await,
            Commands::List(cmd) => cmd.execute(library_config).await,
            Commands::Show(cmd) => cmd.execute(library_config).await,
        }
    }
}
