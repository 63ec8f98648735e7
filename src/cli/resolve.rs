//! Resolve a whole connector library.
//!
//! Prints the resolved library as one mapping of connector identifier to
//! connector document, sorted by identifier.
//!
//! ```bash
//! connector-lib resolve ./connectors
//! connector-lib resolve ./connectors --format yaml --parallel
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::common::{render_document, validate_format};
use crate::config::LibraryConfig;
use crate::library::{Library, LibraryScanner};

const FORMATS: [&str; 2] = ["json", "yaml"];

/// Arguments of the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Root directory of the connector library
    directory: PathBuf,

    /// Output format (json, yaml)
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Resolve connectors concurrently
    #[arg(long)]
    parallel: bool,
}

impl ResolveCommand {
    /// Scans the library and prints it.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid format or when the scan fails.
    pub async fn execute(self, config: LibraryConfig) -> Result<()> {
        validate_format(&self.format, &FORMATS)?;

        let library = scan_library(LibraryScanner::with_config(&self.directory, config), self.parallel)
            .await?;
        println!("{}", render_document(&library, &self.format)?);
        Ok(())
    }
}

/// Runs a sequential scan on the blocking pool, or a concurrent scan.
pub(super) async fn scan_library(scanner: LibraryScanner, parallel: bool) -> Result<Library> {
    if parallel {
        return Ok(scanner.scan_concurrent().await?);
    }

    let library = tokio::task::spawn_blocking(move || scanner.scan())
        .await
        .context("Connector scan task failed")??;
    Ok(library)
}
