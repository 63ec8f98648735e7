//! Enterprise connector manifest.
//!
//! A library may ship a plain-text file, `enterprise-connectors-manifest.txt`,
//! anywhere under its root. Each line names a connector file (`MIB2.yaml`);
//! the connectors listed there belong to the enterprise category, every other
//! connector is a community connector.
//!
//! The manifest is consumed by tools that present the library. It plays no
//! part in resolution.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::constants::{COMMUNITY_CATEGORY, ENTERPRISE_CATEGORY};
use crate::core::{LoadError, Result, ScanError};

/// Set of connector identifiers listed in the enterprise manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnterpriseManifest {
    ids: BTreeSet<String>,
    path: Option<PathBuf>,
}

impl EnterpriseManifest {
    /// Walks `root` for the first file named `file_name` and reads it.
    ///
    /// An absent manifest yields an empty set, so every connector is a
    /// community connector.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Walk`] when the directory tree cannot be walked
    /// - [`LoadError::Unreadable`] when the manifest exists but cannot be read
    pub fn discover(root: &Path, file_name: &str) -> Result<Self> {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| ScanError::Walk {
                path: root.to_path_buf(),
                source,
            })?;

            if entry.file_type().is_file() && entry.file_name() == file_name {
                return Self::load(entry.path());
            }
        }

        debug!("No {} under {}", file_name, root.display());
        Ok(Self::default())
    }

    /// Reads the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => LoadError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let mut manifest = Self::parse(&content);
        debug!("Loaded {} enterprise connectors from {}", manifest.len(), path.display());
        manifest.path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Parses manifest text: one connector file name per line.
    ///
    /// Blank lines are ignored. The identifier is the line without its last
    /// extension; a line without a dot is used as is.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let ids = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.rsplit_once('.').map_or(line, |(stem, _)| stem).to_string())
            .collect();

        Self {
            ids,
            path: None,
        }
    }

    /// Whether connector `id` is an enterprise connector.
    #[must_use]
    pub fn is_enterprise(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Category label of connector `id`.
    #[must_use]
    pub fn category(&self, id: &str) -> &'static str {
        if self.is_enterprise(id) {
            ENTERPRISE_CATEGORY
        } else {
            COMMUNITY_CATEGORY
        }
    }

    /// Listed identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Where the manifest was read from, if it was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of listed identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no connector is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
