//! Template merging.
//!
//! [`merge`] folds an *update* document into a *base* document. It is the
//! defining rule set of the whole engine:
//!
//! 1. Sequences whose base side starts with a mapping are lists of structured
//!    entries (monitors, criteria, sources): the update's elements are
//!    **appended**. Nothing is deduplicated.
//! 2. Any other sequence (empty, or made of scalars) is a plain value list: the
//!    update **replaces** it.
//! 3. Mappings present in the base are merged recursively. An update value
//!    that is not a mapping has no keys to contribute and changes nothing.
//! 4. Everything else (absent keys, scalars, other type mismatches) is
//!    overwritten by the update.
//!
//! Both sides are owned: the update is consumed and the base is modified in
//! place, so a template tree can never end up shared between two children.

use tracing::trace;

use crate::document::Node;

/// Merges `update` into `base` and returns the merged base.
///
/// Keys only present in `base` are kept as they are. An update that is not a
/// mapping carries no keys and leaves `base` unchanged. A base that is not a
/// mapping (an empty template) contributes nothing and the update is taken
/// whole.
///
/// # Examples
///
/// ```
/// use connector_lib::document::Node;
/// use connector_lib::resolver::merge;
///
/// let base = Node::from_yaml_str("tags: [a]\nmonitors: [{name: cpu}]").unwrap();
/// let update = Node::from_yaml_str("tags: [b]\nmonitors: [{name: disk}]").unwrap();
///
/// let merged = merge(base, update);
/// assert_eq!(merged.get("tags").unwrap().len(), 1);
/// assert_eq!(merged.get("monitors").unwrap().len(), 2);
/// ```
#[must_use]
pub fn merge(mut base: Node, update: Node) -> Node {
    merge_into(&mut base, update);
    base
}

/// In-place form of [`merge`].
pub fn merge_into(base: &mut Node, update: Node) {
    let Node::Mapping(updates) = update else {
        return;
    };
    let Some(base_map) = base.as_mapping_mut() else {
        *base = Node::Mapping(updates);
        return;
    };

    for (key, update_value) in updates {
        match base_map.get_mut(&key) {
            Some(base_value) if base_value.is_sequence() && update_value.is_sequence() => {
                merge_sequence(&key, base_value, update_value);
            }
            Some(base_value) if base_value.is_mapping() => {
                merge_into(base_value, update_value);
            }
            Some(base_value) => {
                *base_value = update_value;
            }
            None => {
                base_map.insert(key, update_value);
            }
        }
    }
}

fn merge_sequence(key: &str, base: &mut Node, update: Node) {
    let Node::Sequence(update_items) = update else {
        return;
    };
    let Some(base_items) = base.as_sequence_mut() else {
        return;
    };

    if base_items.first().is_some_and(Node::is_mapping) {
        trace!("Appending {} entries to '{}'", update_items.len(), key);
        base_items.extend(update_items);
    } else {
        trace!("Replacing value list '{}'", key);
        *base_items = update_items;
    }
}
