//! Global constants used throughout the connector library.
//!
//! Connector documents share a small reserved vocabulary of top-level keys
//! that act as an implicit schema. Every component refers to those keys
//! through the constants below instead of scattering string literals.

/// Root key holding the connector section of a definition.
pub const CONNECTOR_KEY: &str = "connector";

/// Key under [`CONNECTOR_KEY`] whose presence makes a definition final.
///
/// Definitions without a non-null `displayName` are templates: they can be
/// extended but are never published in the resolved library.
pub const DISPLAY_NAME_KEY: &str = "displayName";

/// Root key listing the templates a definition inherits from.
pub const EXTENDS_KEY: &str = "extends";

/// Root key holding the symbolic constants table.
pub const CONSTANTS_KEY: &str = "constants";

/// Opening delimiter of a constant placeholder (`${constant::NAME}`).
pub const CONSTANT_PLACEHOLDER_PREFIX: &str = "${constant::";

/// Closing delimiter of a constant placeholder.
pub const CONSTANT_PLACEHOLDER_SUFFIX: &str = "}";

/// Default extension of connector source files (without the leading dot).
pub const DEFAULT_CONNECTOR_EXTENSION: &str = "yaml";

/// File naming the connectors that belong to the enterprise category.
pub const ENTERPRISE_MANIFEST_FILE: &str = "enterprise-connectors-manifest.txt";

/// Category label for connectors listed in the enterprise manifest.
pub const ENTERPRISE_CATEGORY: &str = "enterprise";

/// Category label for every other connector.
pub const COMMUNITY_CATEGORY: &str = "community";

/// Minimum number of concurrent resolutions regardless of CPU count.
pub const MIN_PARALLELISM: usize = 4;

/// Multiplier applied to CPU core count for default parallelism.
///
/// Resolution is mostly file reads and YAML parsing, so a small
/// oversubscription keeps the blocking pool busy.
pub const PARALLELISM_CORE_MULTIPLIER: usize = 2;

/// Default CPU core count when detection fails.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Builds the placeholder token for a constant name.
///
/// ```
/// use connector_lib::constants::constant_placeholder;
///
/// assert_eq!(constant_placeholder("OID"), "${constant::OID}");
/// ```
#[must_use]
pub fn constant_placeholder(name: &str) -> String {
    format!("{CONSTANT_PLACEHOLDER_PREFIX}{name}{CONSTANT_PLACEHOLDER_SUFFIX}")
}

/// Default number of concurrent resolutions for the current machine.
#[must_use]
pub fn default_parallelism() -> usize {
    let cores = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(FALLBACK_CORE_COUNT);
    (cores * PARALLELISM_CORE_MULTIPLIER).max(MIN_PARALLELISM)
}
