//! In-memory document tree for connector files.
//!
//! Every connector and template is parsed into a [`Node`]: ordered mappings
//! with unique string keys, ordered sequences, and scalars. The resolver, the
//! scanner and the read-only accessors all work on this model only.
//!
//! Mapping keys are always text. YAML keys that are not strings (for example
//! the numeric codes of a translation table, `1: "ok"`) are rendered to text
//! when the document is parsed, so `translations.T."1"` is the way to reach
//! them.
//!
//! # Examples
//!
//! ```
//! use connector_lib::document::Node;
//!
//! let node = Node::from_yaml_str("connector:\n  displayName: MIB-2\n").unwrap();
//! assert_eq!(node.get_path(&["connector", "displayName"]).and_then(Node::as_str), Some("MIB-2"));
//! ```

pub mod loader;

pub use loader::load_document;

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use std::borrow::Cow;

/// Ordered mapping of a document tree.
pub type Mapping = IndexMap<String, Node>;

/// A parsed document value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// YAML `null`, `~`, or an empty value
    #[default]
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer or floating point scalar
    Number(serde_yaml::Number),
    /// String scalar
    String(String),
    /// Ordered list of values
    Sequence(Vec<Node>),
    /// Ordered map with unique string keys
    Mapping(Mapping),
}

impl Node {
    /// Parses YAML text into a document tree.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed YAML, including duplicate keys.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<Value>(text).map(Self::from)
    }

    /// An empty mapping.
    #[must_use]
    pub fn mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Whether this node is a mapping.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Whether this node is a sequence.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Whether this node is a scalar (including null).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !self.is_mapping() && !self.is_sequence()
    }

    /// Whether this node is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Child of a mapping by key. `None` for missing keys and non-mappings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Mutable child of a mapping by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Self> {
        self.as_mapping_mut().and_then(|map| map.get_mut(key))
    }

    /// Follows a path of mapping keys.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Self> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Sets a key on a mapping, returning the previous value.
    ///
    /// Does nothing on non-mappings. An existing key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: Self) -> Option<Self> {
        self.as_mapping_mut().and_then(|map| map.insert(key.into(), value))
    }

    /// Appends an element to a sequence. Does nothing on non-sequences.
    pub fn push(&mut self, value: Self) {
        if let Self::Sequence(items) = self {
            items.push(value);
        }
    }

    /// Replaces the whole content of a sequence. Does nothing on non-sequences.
    pub fn replace_sequence(&mut self, values: Vec<Self>) {
        if let Self::Sequence(items) = self {
            *items = values;
        }
    }

    /// Removes every element of a sequence. Does nothing on non-sequences.
    pub fn clear_sequence(&mut self) {
        if let Self::Sequence(items) = self {
            items.clear();
        }
    }

    /// The mapping behind this node, if any.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The mutable mapping behind this node, if any.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The sequence behind this node, if any.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The mutable sequence behind this node, if any.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The string behind a string scalar. Other scalars return `None`; use
    /// [`Node::as_text`] to coerce them.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean behind a boolean scalar.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text form of a scalar; `None` for mappings and sequences.
    ///
    /// Numbers and booleans render the way YAML writes them, null renders as
    /// `null`.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => Some(Cow::Borrowed("null")),
            Self::Bool(b) => Some(Cow::Owned(b.to_string())),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Entries of a mapping in document order. Empty for non-mappings.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.as_mapping().into_iter().flatten().map(|(key, value)| (key.as_str(), value))
    }

    /// Elements of a sequence in order. Empty for non-sequences.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.as_sequence().into_iter().flatten()
    }

    /// Number of entries or elements; zero for scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Mapping(map) => map.len(),
            Self::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    /// Whether [`Node::len`] is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Mapping(
                map.into_iter().map(|(key, value)| (key_text(key), Self::from(value))).collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Vec<Node>> for Node {
    fn from(values: Vec<Node>) -> Self {
        Self::Sequence(values)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

/// Renders a YAML mapping key as text.
fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => key_text(tagged.value),
        complex => serde_yaml::to_string(&complex)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}
