//! Frontmatter types and value flattening.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// Represents parsed YAML frontmatter from a markdown document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Fields as key-value pairs, keys in sorted order.
    pub fields: BTreeMap<String, Value>,
}

impl Frontmatter {
    /// Flatten every field into a list of strings.
    ///
    /// Sequences contribute one entry per element, scalars become a
    /// single-element list and null values an empty one.
    pub fn to_metadata(&self) -> BTreeMap<String, Vec<String>> {
        self.fields.iter().map(|(key, value)| (key.clone(), flatten_value(value))).collect()
    }

    /// Get a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if present).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}

/// Flatten a YAML value into strings.
pub fn flatten_value(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::Tagged(tagged) => flatten_value(&tagged.value),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

/// Render a scalar as a string. Nested mappings and sequences are emitted
/// as inline YAML.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        nested => serde_yaml::to_string(nested).ok().map(|s| s.trim_end().to_string()),
    }
}
