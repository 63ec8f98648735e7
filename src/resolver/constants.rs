//! Constant substitution.
//!
//! A connector may declare a root `constants` table:
//!
//! ```yaml
//! constants:
//!   _OID: 1.3.6.1.2.1.2.2.1
//! connector:
//!   detection:
//!     criteria:
//!       - type: snmpGetNext
//!         oid: ${constant::_OID}
//! ```
//!
//! Every `${constant::NAME}` occurrence inside any string value of the
//! document is replaced with the constant's text. The substitution is a plain
//! substring replacement applied constant by constant, in the order of the
//! table; placeholders without a matching constant are left verbatim.

use tracing::{debug, trace};

use super::{DocumentSource, NodeProcessor};
use crate::constants::{CONSTANTS_KEY, constant_placeholder};
use crate::core::Result;
use crate::document::Node;

/// Replaces constant placeholders throughout a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantsProcessor;

impl ConstantsProcessor {
    /// Substitutes the document's own constants into every string value.
    ///
    /// The document is returned unchanged when it has no `constants` mapping.
    /// Only string scalars are rewritten; numbers, booleans and nulls keep
    /// their type.
    #[must_use]
    pub fn resolve(&self, mut tree: Node) -> Node {
        let replacements = replacement_table(&tree);
        if replacements.is_empty() {
            return tree;
        }

        trace!("Constant replacements: {:?}", replacements);
        substitute(&mut tree, &replacements);
        tree
    }
}

impl NodeProcessor for ConstantsProcessor {
    fn name(&self) -> &'static str {
        "constants"
    }

    fn process(&self, node: Node, _source: &DocumentSource<'_>) -> Result<Node> {
        Ok(self.resolve(node))
    }
}

/// Placeholder → replacement pairs, in the order of the `constants` table.
///
/// Constants whose value is a mapping or a sequence have no text form and
/// are skipped.
fn replacement_table(tree: &Node) -> Vec<(String, String)> {
    let Some(constants) = tree.get(CONSTANTS_KEY).filter(|node| node.is_mapping()) else {
        return Vec::new();
    };

    constants
        .entries()
        .filter_map(|(name, value)| match value.as_text() {
            Some(text) => Some((constant_placeholder(name), text.into_owned())),
            None => {
                debug!("Skipping constant '{}': value is not a scalar", name);
                None
            }
        })
        .collect()
}

fn substitute(node: &mut Node, replacements: &[(String, String)]) {
    match node {
        Node::Mapping(map) => {
            for value in map.values_mut() {
                substitute(value, replacements);
            }
        }
        Node::Sequence(items) => {
            for item in items.iter_mut() {
                substitute(item, replacements);
            }
        }
        Node::String(text) => {
            if let Some(replaced) = replace_placeholders(text, replacements) {
                *text = replaced;
            }
        }
        Node::Null | Node::Bool(_) | Node::Number(_) => {}
    }
}

/// Applies every replacement to `value`; `None` when nothing matched.
fn replace_placeholders(value: &str, replacements: &[(String, String)]) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let mut current: Option<String> = None;
    for (placeholder, replacement) in replacements {
        let text = current.as_deref().unwrap_or(value);
        if text.contains(placeholder.as_str()) {
            current = Some(text.replace(placeholder.as_str(), replacement));
        }
    }
    current
}
