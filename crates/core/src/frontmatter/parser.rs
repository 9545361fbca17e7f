//! Frontmatter parsing from markdown documents.

use std::collections::BTreeMap;

use serde_yaml::Value;
use thiserror::Error;

use super::types::{Frontmatter, ParsedDocument, scalar_to_string};

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("frontmatter must be a YAML mapping")]
    NotMapping,
}

/// Parse frontmatter from markdown content.
///
/// Frontmatter is delimited by a first line of exactly `---` and the next
/// line of exactly `---`:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
/// Without an opening or closing delimiter the whole content is body.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let Some((yaml_content, body)) = split(content) else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let frontmatter = if yaml_content.trim().is_empty() {
        Frontmatter::default()
    } else {
        parse_mapping(yaml_content)?
    };

    Ok(ParsedDocument { frontmatter: Some(frontmatter), body: body.to_string() })
}

/// Split content into (yaml, body) when it opens with a frontmatter block.
fn split(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if strip_eol(first) != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if strip_eol(line) == "---" {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    None
}

fn strip_eol(line: &str) -> &str {
    line.strip_suffix('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).unwrap_or(line)
}

fn parse_mapping(yaml: &str) -> Result<Frontmatter, FrontmatterParseError> {
    let mapping = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(Frontmatter::default()),
        _ => return Err(FrontmatterParseError::NotMapping),
    };

    let mut fields = BTreeMap::new();
    for (key, value) in mapping {
        if let Some(key) = scalar_to_string(&key) {
            fields.insert(key, value);
        }
    }
    Ok(Frontmatter { fields })
}
