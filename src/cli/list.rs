//! List the connectors of a library.
//!
//! One row per final connector: identifier, display name, platforms and
//! category. The category comes from the enterprise manifest found under the
//! library root; without one, every connector is a community connector.
//!
//! ```bash
//! connector-lib list ./connectors
//! connector-lib list ./connectors --format json
//! ```
//!
//! # Table format
//!
//! ```text
//! Connector                Display name                       Platforms                 Category
//! ------------------------------------------------------------------------------------------------
//! Ipmi                     IPMI                               Any platform              enterprise
//! MIB2                     MIB-2 Standard SNMP Agent          Any platform              community
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use super::common::validate_format;
use super::resolve::scan_library;
use crate::config::LibraryConfig;
use crate::library::{ConnectorReader, EnterpriseManifest, Library, LibraryScanner};

const FORMATS: [&str; 2] = ["table", "json"];

/// Arguments of the `list` command.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Root directory of the connector library
    directory: PathBuf,

    /// Output format (table, json)
    #[arg(short = 'f', long, default_value = "table")]
    format: String,

    /// Resolve connectors concurrently
    #[arg(long)]
    parallel: bool,
}

/// One listed connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectorRow {
    id: String,
    display_name: String,
    platforms: Vec<String>,
    category: &'static str,
}

impl ListCommand {
    /// Scans the library and prints one row per connector.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid format, when the scan fails, or when
    /// the enterprise manifest cannot be read.
    pub async fn execute(self, config: LibraryConfig) -> Result<()> {
        validate_format(&self.format, &FORMATS)?;

        let manifest = EnterpriseManifest::discover(&self.directory, &config.enterprise_manifest)?;
        let library =
            scan_library(LibraryScanner::with_config(&self.directory, config), self.parallel).await?;

        let rows = connector_rows(&library, &manifest);
        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            print!("{}", render_table(&rows));
        }
        Ok(())
    }
}

fn connector_rows(library: &Library, manifest: &EnterpriseManifest) -> Vec<ConnectorRow> {
    library
        .iter()
        .map(|(id, connector)| {
            let reader = ConnectorReader::new(connector);
            ConnectorRow {
                id: id.to_string(),
                display_name: reader.display_name(),
                platforms: reader.platforms().into_iter().collect(),
                category: manifest.category(id),
            }
        })
        .collect()
}

fn render_table(rows: &[ConnectorRow]) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        let _ = writeln!(out, "No connectors found.");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<24} {:<34} {:<25} {}",
        "Connector".cyan().bold(),
        "Display name".cyan().bold(),
        "Platforms".cyan().bold(),
        "Category".cyan().bold()
    );
    let _ = writeln!(out, "{}", "-".repeat(96).bright_black());

    for row in rows {
        let _ = writeln!(
            out,
            "{:<24} {:<34} {:<25} {}",
            row.id.bright_white(),
            row.display_name,
            row.platforms.join(", "),
            row.category
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {} connectors", "Total".green().bold(), rows.len());
    out
}
