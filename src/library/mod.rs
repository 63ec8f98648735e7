//! Connector library scanning.
//!
//! A connector library is a directory tree of YAML files. Some of them are
//! final connectors (they define `connector.displayName`), the others are
//! templates that only exist to be extended. [`LibraryScanner`] walks the tree,
//! resolves every final connector through the [`Pipeline`] and returns the
//! [`Library`]: identifier → fully resolved document. Templates are never part
//! of the library; they are loaded on demand while their children resolve.
//!
//! The identifier of a connector is its file name without the extension
//! (`snmp/MIB2.yaml` → `MIB2`).
//!
//! # Scanning modes
//!
//! - [`LibraryScanner::scan`] resolves one file at a time on the calling thread.
//! - [`LibraryScanner::scan_concurrent`] resolves files on the blocking thread
//!   pool, at most [`LibraryConfig::parallelism`] at a time.
//!
//! Both modes produce the same library and both stop at the first file that
//! fails to resolve. Templates reached from several connectors are loaded once
//! per connector; no template tree is ever shared between two workers.
//!
//! # Examples
//!
//! ```rust,no_run
//! use connector_lib::library::LibraryScanner;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let library = LibraryScanner::new("connectors").scan_concurrent().await?;
//! for (id, connector) in library.iter() {
//!     println!("{id}: {} keys", connector.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod manifest;
pub mod reader;

pub use manifest::EnterpriseManifest;
pub use reader::ConnectorReader;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibraryConfig;
use crate::constants::{CONNECTOR_KEY, DISPLAY_NAME_KEY};
use crate::core::{ResolveError, Result, ScanError};
use crate::document::{Node, load_document};
use crate::resolver::{DocumentSource, Pipeline};

/// Resolved connectors keyed by identifier, in identifier order.
///
/// Serializes as a plain mapping of identifier to document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Library {
    connectors: BTreeMap<String, Node>,
}

impl Library {
    /// Resolved document of connector `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.connectors.get(id)
    }

    /// Whether connector `id` is part of the library.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.connectors.contains_key(id)
    }

    /// Number of connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Whether the library has no connectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Connector identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.connectors.keys().map(String::as_str)
    }

    /// Identifier and document pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.connectors.iter().map(|(id, node)| (id.as_str(), node))
    }

    /// Consumes the library into its underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Node> {
        self.connectors
    }
}

/// File counts collected while scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Final connectors resolved into the library
    pub connectors: usize,
    /// Files with the connector extension that are templates
    pub templates: usize,
    /// Files ignored because of their extension
    pub skipped: usize,
}

/// What a single eligible file turned out to be.
enum Candidate {
    Connector,
    Template,
}

/// Walks a connector directory and resolves every final connector in it.
#[derive(Debug, Clone)]
pub struct LibraryScanner {
    root: PathBuf,
    config: LibraryConfig,
    pipeline: Arc<Pipeline>,
}

impl LibraryScanner {
    /// Scanner for `root` with the default configuration.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, LibraryConfig::default())
    }

    /// Scanner for `root` with a custom configuration.
    pub fn with_config(root: impl Into<PathBuf>, config: LibraryConfig) -> Self {
        let pipeline = Arc::new(Pipeline::standard(config.extension()));
        Self {
            root: root.into(),
            config,
            pipeline,
        }
    }

    /// Library root being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Resolves every final connector under the root, one file at a time.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Scan`] when the root is missing, not a directory, or
    ///   cannot be walked
    /// - [`ResolveError::Connector`] wrapping the failure of the first
    ///   connector that could not be loaded or resolved
    pub fn scan(&self) -> Result<Library> {
        self.scan_with_stats().map(|(library, _)| library)
    }

    /// Same as [`LibraryScanner::scan`], also returning file counts.
    ///
    /// # Errors
    ///
    /// See [`LibraryScanner::scan`].
    pub fn scan_with_stats(&self) -> Result<(Library, ScanStats)> {
        let (files, mut stats) = eligible_files(&self.root, &self.config)?;

        let mut connectors = BTreeMap::new();
        for path in files {
            let id = connector_id(&path);
            match resolve_candidate(&self.pipeline, &id, &path)? {
                Some(node) => {
                    if connectors.insert(id.clone(), node).is_some() {
                        warn!("Duplicate connector identifier '{}' at {}", id, path.display());
                    }
                    stats.connectors += 1;
                }
                None => stats.templates += 1,
            }
        }

        log_summary(&self.root, &stats);
        Ok((
            Library {
                connectors,
            },
            stats,
        ))
    }

    /// Resolves every final connector under the root on the blocking pool.
    ///
    /// At most [`LibraryConfig::parallelism`] files are resolved at the same
    /// time. The scan stops at the first failure; workers already running
    /// finish but their results are discarded.
    ///
    /// # Errors
    ///
    /// See [`LibraryScanner::scan`]. Additionally returns
    /// [`ScanError::Task`] when a worker panics.
    pub async fn scan_concurrent(&self) -> Result<Library> {
        let root = self.root.clone();
        let config = self.config.clone();
        let (files, mut stats) = tokio::task::spawn_blocking(move || eligible_files(&root, &config))
            .await
            .map_err(task_error)??;

        let limit = self.config.parallelism();
        debug!("Resolving {} files with up to {} workers", files.len(), limit);

        let connectors: Arc<DashMap<String, Node>> = Arc::new(DashMap::new());
        let candidates: Vec<Candidate> = stream::iter(files)
            .map(|path| {
                let pipeline = Arc::clone(&self.pipeline);
                let connectors = Arc::clone(&connectors);
                async move {
                    tokio::task::spawn_blocking(move || -> Result<Candidate> {
                        let id = connector_id(&path);
                        let Some(node) = resolve_candidate(&pipeline, &id, &path)? else {
                            return Ok(Candidate::Template);
                        };
                        if connectors.insert(id.clone(), node).is_some() {
                            warn!("Duplicate connector identifier '{}' at {}", id, path.display());
                        }
                        Ok(Candidate::Connector)
                    })
                    .await
                    .unwrap_or_else(|e| Err(task_error(e)))
                }
            })
            .buffer_unordered(limit)
            .try_collect()
            .await?;

        for candidate in &candidates {
            match candidate {
                Candidate::Connector => stats.connectors += 1,
                Candidate::Template => stats.templates += 1,
            }
        }
        log_summary(&self.root, &stats);

        // Every worker has completed, so this is the last reference.
        let connectors = Arc::try_unwrap(connectors).unwrap_or_else(|shared| (*shared).clone());
        Ok(Library {
            connectors: connectors.into_iter().collect(),
        })
    }

    /// Resolves a single file, final connector or template.
    ///
    /// # Errors
    ///
    /// Returns a load error for the file or any template it extends, or an
    /// extends cycle.
    pub fn resolve_file(&self, path: &Path) -> Result<Node> {
        self.pipeline.resolve_file(path)
    }
}

/// Whether `node` is a final connector, i.e. defines a non-null
/// `connector.displayName`.
#[must_use]
pub fn is_final_connector(node: &Node) -> bool {
    node.get_path(&[CONNECTOR_KEY, DISPLAY_NAME_KEY]).is_some_and(|name| !name.is_null())
}

/// Identifier of the connector stored at `path`: the file name minus its
/// last extension.
#[must_use]
pub fn connector_id(path: &Path) -> String {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Lists the files under `root` carrying the connector extension.
fn eligible_files(
    root: &Path,
    config: &LibraryConfig,
) -> std::result::Result<(Vec<PathBuf>, ScanStats), ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut stats = ScanStats::default();
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(config.follow_links).sort_by_file_name() {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        if config.matches_extension(entry.path()) {
            files.push(entry.into_path());
        } else {
            debug!("Skipping {}: not a connector file", entry.path().display());
            stats.skipped += 1;
        }
    }

    Ok((files, stats))
}

/// Loads one eligible file and resolves it when it is a final connector.
///
/// Returns `None` for templates. Any failure is attributed to `id`.
fn resolve_candidate(pipeline: &Pipeline, id: &str, path: &Path) -> Result<Option<Node>> {
    let node = load_document(path).map_err(|e| ResolveError::from(e).for_connector(id))?;
    if !is_final_connector(&node) {
        debug!("Skipping template {}", path.display());
        return Ok(None);
    }

    debug!("Resolving connector '{}' from {}", id, path.display());
    pipeline
        .process(node, &DocumentSource::from_path(path))
        .map(Some)
        .map_err(|e| e.for_connector(id))
}

fn task_error(error: tokio::task::JoinError) -> ResolveError {
    ScanError::Task {
        reason: error.to_string(),
    }
    .into()
}

fn log_summary(root: &Path, stats: &ScanStats) {
    info!(
        "Resolved {} connectors from {} ({} templates, {} other files)",
        stats.connectors,
        root.display(),
        stats.templates,
        stats.skipped
    );
}
