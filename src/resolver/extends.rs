//! Template inheritance through the `extends` key.
//!
//! A connector lists the templates it inherits from:
//!
//! ```yaml
//! extends:
//!   - Hardware
//!   - MIB2Header
//! ```
//!
//! Each identifier names a file in the directory of the referencing document
//! (`Hardware.yaml`). Templates are resolved depth-first, folded left to right
//! into one base, and the referencing document is merged last so that its own
//! fields always win. See [`crate::resolver::merge`] for the merge rules.
//!
//! Unlike a plain recursive walk, the resolver tracks the chain of templates
//! currently being resolved and fails with [`ResolveError::CyclicExtends`] when
//! a template comes back around. A template reached twice through different
//! branches (a diamond) is not a cycle and is simply loaded twice.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{DocumentSource, NodeProcessor, merge};
use crate::constants::{DEFAULT_CONNECTOR_EXTENSION, EXTENDS_KEY};
use crate::core::{ResolveError, Result};
use crate::document::{Node, load_document};

/// Resolves the `extends` list of a document.
#[derive(Debug, Clone)]
pub struct ExtendsProcessor {
    extension: String,
}

/// One document on the chain currently being resolved.
#[derive(Debug, Clone)]
struct ChainLink {
    id: String,
    path: PathBuf,
}

impl ExtendsProcessor {
    /// Creates a resolver that appends `extension` to template identifiers.
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Resolves `tree` against templates located in `directory`.
    ///
    /// Returns `tree` unchanged when it has no `extends` list (or one that is
    /// not a sequence). Otherwise the returned tree is the merge of every
    /// template with `tree` applied last, and the `extends` list is emptied.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Load`] when a referenced template cannot be loaded
    /// - [`ResolveError::CyclicExtends`] when templates extend each other in a loop
    pub fn resolve(&self, tree: Node, directory: &Path) -> Result<Node> {
        self.resolve_chain(tree, directory, &mut Vec::new())
    }

    /// Same as [`ExtendsProcessor::resolve`] for a document loaded from `path`.
    ///
    /// The document itself is the first link of the chain, so a template that
    /// extends the document back is reported as a cycle.
    pub fn resolve_document(&self, tree: Node, id: &str, path: &Path) -> Result<Node> {
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let mut chain = vec![ChainLink {
            id: id.to_string(),
            path: normalize(path),
        }];
        self.resolve_chain(tree, directory, &mut chain)
    }

    fn resolve_chain(
        &self,
        mut tree: Node,
        directory: &Path,
        chain: &mut Vec<ChainLink>,
    ) -> Result<Node> {
        let Some(identifiers) = extends_identifiers(&tree) else {
            return Ok(tree);
        };

        let mut accumulated: Option<Node> = None;
        for id in &identifiers {
            let template = self.load_template(id, directory, chain)?;
            accumulated = Some(match accumulated {
                None => template,
                Some(base) => merge(base, template),
            });
        }

        if let Some(extends) = tree.get_mut(EXTENDS_KEY) {
            extends.clear_sequence();
        }

        Ok(match accumulated {
            Some(base) => merge(base, tree),
            None => tree,
        })
    }

    fn load_template(
        &self,
        id: &str,
        directory: &Path,
        chain: &mut Vec<ChainLink>,
    ) -> Result<Node> {
        let path = directory.join(format!("{id}.{}", self.extension));
        let normalized = normalize(&path);

        if let Some(start) = chain.iter().position(|link| link.path == normalized) {
            let mut cycle: Vec<String> = chain[start..].iter().map(|link| link.id.clone()).collect();
            cycle.push(id.to_string());
            return Err(ResolveError::cyclic(&cycle));
        }

        debug!("Loading template '{}' from {}", id, path.display());
        let template = load_document(&path)?;
        let template_directory = path.parent().map_or_else(|| directory.to_path_buf(), Path::to_path_buf);

        chain.push(ChainLink {
            id: id.to_string(),
            path: normalized,
        });
        let resolved = self.resolve_chain(template, &template_directory, chain);
        chain.pop();
        resolved
    }
}

impl Default for ExtendsProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTOR_EXTENSION)
    }
}

impl NodeProcessor for ExtendsProcessor {
    fn name(&self) -> &'static str {
        "extends"
    }

    fn process(&self, node: Node, source: &DocumentSource<'_>) -> Result<Node> {
        match source.path {
            Some(path) => self.resolve_document(node, source.id, path),
            None => self.resolve(node, source.directory),
        }
    }
}

/// Template identifiers listed under `extends`, in order.
///
/// `None` when the key is absent or is not a sequence. Entries that are not
/// scalars, or are null, are skipped.
fn extends_identifiers(tree: &Node) -> Option<Vec<String>> {
    let extends = tree.get(EXTENDS_KEY)?.as_sequence()?;
    Some(
        extends
            .iter()
            .filter(|entry| !entry.is_null())
            .filter_map(Node::as_text)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect(),
    )
}

/// Canonical form of a path used to recognise the same file on the chain.
fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
