//! Resolve and print a single connector or template file.
//!
//! Unlike `resolve`, this accepts templates too, which makes it the quickest
//! way to check what a template contributes once its own `extends` are merged.
//!
//! ```bash
//! connector-lib show ./connectors/snmp/MIB2.yaml
//! connector-lib show ./connectors/common/Hardware.yaml --format json
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::{render_document, validate_format};
use crate::config::LibraryConfig;
use crate::resolver::Pipeline;

const FORMATS: [&str; 2] = ["yaml", "json"];

/// Arguments of the `show` command.
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Connector or template file
    file: PathBuf,

    /// Output format (yaml, json)
    #[arg(short = 'f', long, default_value = "yaml")]
    format: String,
}

impl ShowCommand {
    /// Resolves the file and prints it.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid format or when resolution fails.
    pub async fn execute(self, config: LibraryConfig) -> Result<()> {
        println!("{}", self.render(&config)?);
        Ok(())
    }

    fn render(&self, config: &LibraryConfig) -> Result<String> {
        validate_format(&self.format, &FORMATS)?;

        let node = Pipeline::standard(config.extension()).resolve_file(&self.file)?;
        render_document(&node, &self.format)
    }
}
