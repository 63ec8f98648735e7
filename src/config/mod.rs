//! Library configuration.
//!
//! Settings that control how a connector library is scanned are read from an
//! optional TOML file, usually passed with `--config`:
//!
//! ```toml
//! # File extension of connector and template files (without the dot)
//! extension = "yaml"
//!
//! # Follow symbolic links while walking the library
//! follow_links = true
//!
//! # Name of the file listing enterprise connectors
//! enterprise_manifest = "enterprise-connectors-manifest.txt"
//!
//! # Maximum number of files resolved at the same time by the concurrent scan
//! max_parallel = 8
//! ```
//!
//! Every field is optional. A missing file yields the defaults, while a file
//! that exists but cannot be parsed is an error: a typo should never silently
//! fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{DEFAULT_CONNECTOR_EXTENSION, ENTERPRISE_MANIFEST_FILE, default_parallelism};

fn default_extension() -> String {
    DEFAULT_CONNECTOR_EXTENSION.to_string()
}

const fn default_follow_links() -> bool {
    true
}

fn default_enterprise_manifest() -> String {
    ENTERPRISE_MANIFEST_FILE.to_string()
}

/// Scan settings for a connector library.
///
/// # Examples
///
/// ```rust
/// use connector_lib::config::LibraryConfig;
///
/// let config: LibraryConfig = toml::from_str("extension = \"yml\"").unwrap();
/// assert_eq!(config.extension(), "yml");
/// assert!(config.follow_links);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Extension of connector files, matched case-insensitively.
    ///
    /// Also appended to `extends` identifiers when templates are looked up.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Whether the directory walk follows symbolic links.
    #[serde(default = "default_follow_links")]
    pub follow_links: bool,

    /// File name of the enterprise connector manifest.
    #[serde(default = "default_enterprise_manifest")]
    pub enterprise_manifest: String,

    /// Concurrency limit for [`LibraryScanner::scan_concurrent`].
    ///
    /// When unset, [`default_parallelism`] is used.
    ///
    /// [`LibraryScanner::scan_concurrent`]: crate::library::LibraryScanner::scan_concurrent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            follow_links: default_follow_links(),
            enterprise_manifest: default_enterprise_manifest(),
            max_parallel: None,
        }
    }
}

impl LibraryConfig {
    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// configuration.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read library config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse library config from {}", path.display()))
    }

    /// Loads the configuration from `path` when given and present, defaults
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(&path).await,
            Some(path) => {
                tracing::debug!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Extension without a leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Replaces the extension, e.g. from a command-line override.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Whether `path` has the configured extension (case-insensitive).
    #[must_use]
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }

    /// Effective concurrency limit, never below 1.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.max_parallel.unwrap_or_else(default_parallelism).max(1)
    }
}
