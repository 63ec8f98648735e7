//! Single-document loading.
//!
//! Reads one connector or template file and parses it into a [`Node`]. No
//! resolution happens here; `extends` and `constants` are left untouched.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use super::Node;
use crate::core::LoadError;

/// Loads and parses the YAML document at `path`.
///
/// # Errors
///
/// - [`LoadError::NotFound`] when the file does not exist
/// - [`LoadError::Unreadable`] for any other read failure
/// - [`LoadError::Malformed`] when the content is not valid YAML
pub fn load_document(path: &Path) -> Result<Node, LoadError> {
    debug!("Loading connector document {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Node::from_yaml_str(&content).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
