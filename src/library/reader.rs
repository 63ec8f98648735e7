//! Read-only accessors over a resolved connector.
//!
//! Tools that present a connector library (documentation pages, listings)
//! only need a handful of well-known fields. [`ConnectorReader`] exposes them
//! with the lenient conventions connector authors rely on: absent sections read
//! as empty, and a list field written as a single comma-separated string
//! (`platforms: Linux, AIX`) reads the same as a YAML sequence.
//!
//! The reader never modifies the document it wraps.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Serialize;

use crate::constants::{COMMUNITY_CATEGORY, CONNECTOR_KEY, DISPLAY_NAME_KEY, ENTERPRISE_CATEGORY};
use crate::document::Node;

const DETECTION_KEY: &str = "detection";
const CRITERIA_KEY: &str = "criteria";
const MONITORS_KEY: &str = "monitors";
const PRODUCT_REQUIREMENTS_TYPE: &str = "productRequirements";
const MONITOR_JOBS: [&str; 3] = ["discovery", "collect", "simple"];
const VARIABLE_PATTERN: &str = r"\$\{var::(.*?)\}";

/// A connector variable declared under `connector.variables`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultVariable {
    /// Human-readable description
    pub description: Option<String>,
    /// Value used when the user does not provide one
    pub default_value: Option<String>,
}

/// Typed view of a resolved connector document.
///
/// # Examples
///
/// ```
/// use connector_lib::document::Node;
/// use connector_lib::library::ConnectorReader;
///
/// let node = Node::from_yaml_str(
///     "connector:\n  displayName: MIB-2\n  platforms: Any platform, Linux\n",
/// )
/// .unwrap();
/// let reader = ConnectorReader::new(&node);
///
/// assert_eq!(reader.display_name(), "MIB-2");
/// assert_eq!(reader.platforms().len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConnectorReader<'a> {
    connector: &'a Node,
}

impl<'a> ConnectorReader<'a> {
    /// Wraps a resolved connector.
    #[must_use]
    pub const fn new(connector: &'a Node) -> Self {
        Self {
            connector,
        }
    }

    /// Underlying document.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.connector
    }

    /// `connector.displayName`, or an empty string.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.section_text(DISPLAY_NAME_KEY).unwrap_or_default()
    }

    /// `connector.information`, or `default`.
    #[must_use]
    pub fn information_or(&self, default: &str) -> String {
        self.section_text("information").unwrap_or_else(|| default.to_string())
    }

    /// `connector.reliesOn`, or `default`.
    #[must_use]
    pub fn relies_on_or(&self, default: &str) -> String {
        self.section_text("reliesOn").unwrap_or_else(|| default.to_string())
    }

    /// `connector.platforms`, sorted and deduplicated.
    #[must_use]
    pub fn platforms(&self) -> BTreeSet<String> {
        string_list(self.section().and_then(|s| s.get("platforms"))).into_iter().collect()
    }

    /// `connector.detection.tags`.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        string_list(self.detection().and_then(|d| d.get("tags")))
    }

    /// Tags followed by the category label (`enterprise` or `community`).
    ///
    /// Empty when the connector has no detection section.
    #[must_use]
    pub fn tags_with_category(&self, is_enterprise: bool) -> Vec<String> {
        if self.detection().is_none() {
            return Vec::new();
        }

        let mut tags = self.tags();
        tags.push(if is_enterprise { ENTERPRISE_CATEGORY } else { COMMUNITY_CATEGORY }.to_string());
        tags
    }

    /// `connector.detection.supersedes`.
    #[must_use]
    pub fn supersedes(&self) -> Vec<String> {
        string_list(self.detection().and_then(|d| d.get("supersedes")))
    }

    /// `connector.detection.appliesTo`.
    #[must_use]
    pub fn applies_to(&self) -> Vec<String> {
        string_list(self.detection().and_then(|d| d.get("appliesTo")))
    }

    /// `connector.detection.connectionTypes`, lower-cased.
    #[must_use]
    pub fn connection_types(&self) -> BTreeSet<String> {
        string_list(self.detection().and_then(|d| d.get("connectionTypes")))
            .into_iter()
            .map(|kind| kind.to_lowercase())
            .collect()
    }

    /// Whether `connector.detection.disableAutoDetection` is boolean `true`.
    #[must_use]
    pub fn is_auto_detection_disabled(&self) -> bool {
        self.detection()
            .and_then(|d| d.get("disableAutoDetection"))
            .and_then(Node::as_bool)
            .unwrap_or(false)
    }

    /// `connector.detection.onLastResort`.
    #[must_use]
    pub fn on_last_resort(&self) -> Option<String> {
        self.detection().and_then(|d| d.get("onLastResort")).and_then(non_null_text)
    }

    /// Detection criteria, in order.
    #[must_use]
    pub fn criteria(&self) -> &'a [Node] {
        self.detection().and_then(|d| d.get(CRITERIA_KEY)).and_then(Node::as_sequence).unwrap_or(&[])
    }

    /// `engineVersion` of the first `productRequirements` criterion.
    #[must_use]
    pub fn required_engine_version(&self) -> Option<String> {
        self.criteria()
            .iter()
            .filter(|criterion| {
                criterion
                    .get("type")
                    .and_then(Node::as_str)
                    .is_some_and(|kind| kind.eq_ignore_ascii_case(PRODUCT_REQUIREMENTS_TYPE))
            })
            .find_map(|criterion| criterion.get("engineVersion").and_then(non_null_text))
    }

    /// Monitors by monitor type, in document order.
    pub fn monitors(&self) -> impl Iterator<Item = (&'a str, &'a Node)> + 'a {
        let connector = self.connector;
        connector.get(MONITORS_KEY).into_iter().flat_map(Node::entries)
    }

    /// Root `sudoCommands` list.
    #[must_use]
    pub fn sudo_commands(&self) -> Vec<String> {
        string_list(self.connector.get("sudoCommands"))
    }

    /// Metric names mapped by the jobs of `monitor`.
    ///
    /// Internal keys (starting with `__`) are left out.
    #[must_use]
    pub fn monitor_metrics(monitor: &Node) -> BTreeSet<String> {
        mapping_keys(monitor, "metrics")
    }

    /// Attribute names mapped by the jobs of `monitor`.
    ///
    /// Internal keys (starting with `__`) are left out.
    #[must_use]
    pub fn monitor_attributes(monitor: &Node) -> BTreeSet<String> {
        mapping_keys(monitor, "attributes")
    }

    /// Names of every `${var::NAME}` placeholder used in the connector.
    #[must_use]
    pub fn variable_names(&self) -> BTreeSet<String> {
        let Ok(pattern) = Regex::new(VARIABLE_PATTERN) else {
            return BTreeSet::new();
        };

        let mut names = BTreeSet::new();
        collect_variables(self.connector, &pattern, &mut names);
        names
    }

    /// Variables declared under `connector.variables`.
    #[must_use]
    pub fn default_variables(&self) -> BTreeMap<String, DefaultVariable> {
        self.section()
            .and_then(|s| s.get("variables"))
            .into_iter()
            .flat_map(Node::entries)
            .map(|(name, variable)| {
                (
                    name.to_string(),
                    DefaultVariable {
                        description: variable.get("description").and_then(non_null_text),
                        default_value: variable.get("defaultValue").and_then(non_null_text),
                    },
                )
            })
            .collect()
    }

    fn section(&self) -> Option<&'a Node> {
        self.connector.get(CONNECTOR_KEY)
    }

    fn section_text(&self, key: &str) -> Option<String> {
        self.section().and_then(|s| s.get(key)).and_then(non_null_text)
    }

    fn detection(&self) -> Option<&'a Node> {
        self.section().and_then(|s| s.get(DETECTION_KEY)).filter(|d| !d.is_null())
    }
}

fn non_null_text(node: &Node) -> Option<String> {
    if node.is_null() {
        return None;
    }
    node.as_text().map(std::borrow::Cow::into_owned)
}

/// Reads a list field: a sequence of scalars, or one comma-separated string.
fn string_list(node: Option<&Node>) -> Vec<String> {
    match node {
        None | Some(Node::Null) => Vec::new(),
        Some(Node::Sequence(items)) => items.iter().filter_map(non_null_text).collect(),
        Some(other) => other
            .as_text()
            .map(|text| text.split(',').map(|part| part.trim().to_string()).collect())
            .unwrap_or_default(),
    }
}

fn mapping_keys(monitor: &Node, section: &str) -> BTreeSet<String> {
    MONITOR_JOBS
        .into_iter()
        .filter_map(|job| monitor.get_path(&[job, "mapping", section]))
        .flat_map(Node::entries)
        .map(|(key, _)| key)
        .filter(|key| !key.starts_with("__"))
        .map(str::to_string)
        .collect()
}

fn collect_variables(node: &Node, pattern: &Regex, names: &mut BTreeSet<String>) {
    match node {
        Node::String(text) => {
            names.extend(pattern.captures_iter(text).filter_map(|c| c.get(1)).map(|m| m.as_str().to_string()));
        }
        Node::Sequence(items) => {
            for item in items {
                collect_variables(item, pattern, names);
            }
        }
        Node::Mapping(map) => {
            for value in map.values() {
                collect_variables(value, pattern, names);
            }
        }
        Node::Null | Node::Bool(_) | Node::Number(_) => {}
    }
}
