//! Front matter extraction with gray_matter.
//!
//! Documents and layouts may start with a YAML block delimited by `---` lines.
//! The block becomes the item's metadata mapping; everything after it is the body.

use anyhow::{Context, Result};
use gray_matter::{Matter, engine::YAML};
use serde_json::{Map, Value};
use std::path::Path;

/// Result of splitting raw file content into metadata and body.
#[derive(Debug, Clone, Default)]
pub struct ParsedFrontmatter {
    /// Front matter as a JSON mapping (empty when absent)
    pub data: Map<String, Value>,

    /// Content with the front matter block removed
    pub content: String,

    /// Whether a front matter block was present
    pub has_frontmatter: bool,
}

/// Split `raw` into front matter and body.
///
/// An empty block (`---\n---`) yields an empty mapping. A block that is not a
/// mapping (e.g. a bare list) is rejected.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or cannot be represented as JSON.
pub fn parse_frontmatter(raw: &str, path: &Path) -> Result<ParsedFrontmatter> {
    let matter: Matter<YAML> = Matter::new();
    let parsed = matter
        .parse::<serde_yaml::Value>(raw)
        .with_context(|| format!("Failed to parse front matter in {}", path.display()))?;

    let has_frontmatter = parsed.data.is_some() || raw.starts_with("---");
    let data = match parsed.data {
        None | Some(serde_yaml::Value::Null) => Map::new(),
        Some(yaml) => {
            let json = serde_json::to_value(&yaml).with_context(|| {
                format!("Front matter in {} is not representable as JSON", path.display())
            })?;
            match json {
                Value::Object(map) => map,
                other => anyhow::bail!(
                    "Front matter in {} must be a mapping, found {}",
                    path.display(),
                    json_type_name(&other)
                ),
            }
        }
    };

    Ok(ParsedFrontmatter {
        data,
        content: parsed.content,
        has_frontmatter,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
