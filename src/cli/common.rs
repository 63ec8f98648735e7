//! Output helpers shared by the commands.

use anyhow::{Result, anyhow};
use serde::Serialize;

/// Checks `format` against the values a command accepts.
pub fn validate_format(format: &str, valid: &[&str]) -> Result<()> {
    if valid.contains(&format) {
        Ok(())
    } else {
        Err(anyhow!("Invalid format '{}'. Valid formats are: {}", format, valid.join(", ")))
    }
}

/// Serializes `value` as pretty JSON or YAML.
pub fn render_document<T: Serialize>(value: &T, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(value)?),
        "yaml" => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
        other => Err(anyhow!("Invalid format '{other}'. Valid formats are: json, yaml")),
    }
}
