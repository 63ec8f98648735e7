//! connector-lib - resolution engine for YAML monitoring connector libraries
//!
//! A connector library is a directory of YAML documents describing how to
//! detect and monitor devices. Documents share content in two ways:
//!
//! - **Inheritance**: a document lists templates under `extends`; their content
//!   is merged underneath it, recursively.
//! - **Constants**: a document declares a `constants` table and refers to its
//!   entries as `${constant::NAME}` inside string values.
//!
//! This crate turns such a directory into a [`library::Library`] of fully
//! resolved connectors, keyed by identifier.
//!
//! # Modules
//!
//! - [`document`] - the document tree model and the single-file loader
//! - [`resolver`] - merge rules, `extends` and `constants` stages, and the
//!   [`resolver::Pipeline`] chaining them
//! - [`library`] - directory scanning, the enterprise manifest, and read-only
//!   connector accessors
//! - [`config`] - TOML configuration of a scan
//! - [`core`] - error types and user-facing error rendering
//! - [`constants`] - reserved keys and defaults
//! - [`cli`] - the `connector-lib` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use connector_lib::library::{ConnectorReader, LibraryScanner};
//!
//! # fn example() -> connector_lib::core::Result<()> {
//! let library = LibraryScanner::new("connectors").scan()?;
//! if let Some(mib2) = library.get("MIB2") {
//!     println!("{}", ConnectorReader::new(mib2).display_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod document;
pub mod library;
pub mod resolver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
