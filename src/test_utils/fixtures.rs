//! On-disk connector fixtures.
//!
//! Connector tests need real files because templates are located relative to
//! the file that extends them. [`ConnectorFixture`] owns a temporary library
//! directory and writes connectors, templates and manifests into it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::ENTERPRISE_MANIFEST_FILE;

/// Temporary connector library, deleted on drop.
#[derive(Debug)]
pub struct ConnectorFixture {
    dir: TempDir,
}

impl ConnectorFixture {
    /// Creates an empty library directory.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temporary connector library")?;
        Ok(Self {
            dir,
        })
    }

    /// Root of the library.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Writes a template (no `connector.displayName`) named `id`.
    pub fn template(&self, id: &str, body: &str) -> Result<PathBuf> {
        self.file(&format!("{id}.yaml"), body)
    }

    /// Writes a final connector named `id`.
    ///
    /// `body` is appended after a generated `connector.displayName` section,
    /// so it must not define a root `connector` key itself.
    pub fn connector(&self, id: &str, display_name: &str, body: &str) -> Result<PathBuf> {
        let content = format!("connector:\n  displayName: \"{display_name}\"\n{body}");
        self.file(&format!("{id}.yaml"), &content)
    }

    /// Writes the enterprise manifest listing `ids`.
    pub fn enterprise_manifest(&self, ids: &[&str]) -> Result<PathBuf> {
        let content: String = ids.iter().map(|id| format!("{id}.yaml\n")).collect();
        self.file(ENTERPRISE_MANIFEST_FILE, &content)
    }
}
