//! Note content extraction: links, tags, title, frontmatter.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::frontmatter::{self, Frontmatter, FrontmatterParseError};
use crate::index::types::Document;

// Regex patterns for link extraction
static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [[target]] or [[target|alias]]
    // Also handles [[target#section]] and [[target#section|alias]]
    Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]*)?\]\]").unwrap()
});

static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Matches [text](target) and ![alt](src); embeds are filtered by the caller
    Regex::new(r"(!?)\[([^\]]*)\]\(([^)]+)\)").unwrap()
});

/// Parse a note into an index document.
///
/// `path` must already be the canonical index key.
pub fn parse_document(
    path: PathBuf,
    content: &str,
    modified: DateTime<Utc>,
) -> Result<Document, FrontmatterParseError> {
    let parsed = frontmatter::parse(content)?;
    let fm = parsed.frontmatter.unwrap_or_default();

    let front_matter = fm.to_metadata();
    let tags = extract_tags(front_matter.get("tags").map(Vec::as_slice).unwrap_or_default());
    let title = extract_title(&fm, &parsed.body, &path);
    let links = extract_links(&parsed.body);

    Ok(Document { path, title, tags, front_matter, links, body: parsed.body, modified })
}

/// Normalise raw `tags` values: trim, drop a leading `#`, skip blanks and
/// repeats while keeping the written order.
pub fn extract_tags(raw: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .map(|tag| tag.trim().trim_start_matches('#').trim())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.to_string()))
        .map(str::to_string)
        .collect()
}

/// Extract wiki-style and markdown link targets from body text.
///
/// Returns a sorted, deduplicated list of raw targets.
pub fn extract_links(body: &str) -> Vec<String> {
    let mut links = BTreeSet::new();

    for cap in WIKILINK_RE.captures_iter(body) {
        let target = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if !target.is_empty() {
            links.insert(target.to_string());
        }
    }

    for cap in MARKDOWN_LINK_RE.captures_iter(body) {
        // Skip image embeds
        if cap.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            continue;
        }
        let raw = cap.get(3).map(|m| m.as_str()).unwrap_or("");
        if let Some(target) = markdown_target(raw) {
            links.insert(target);
        }
    }

    links.into_iter().collect()
}

/// Strip `<...>` wrapping and an optional quoted title from a link destination.
fn markdown_target(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let target = match raw.strip_prefix('<') {
        Some(rest) => rest.split('>').next().unwrap_or(rest),
        None => raw.split_whitespace().next().unwrap_or(""),
    };
    let target = target.trim();
    if target.is_empty() { None } else { Some(target.to_string()) }
}

fn extract_title(fm: &Frontmatter, body: &str, file_path: &Path) -> String {
    if let Some(title) = fm.get_str("title") {
        return title.to_string();
    }

    for line in body.lines() {
        let trimmed = line.trim();
        if let Some(heading) = trimmed.strip_prefix('#') {
            let heading = heading.trim_start_matches('#').trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        }
    }

    file_path.file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Document {
        parse_document(PathBuf::from("/vault/test.md"), content, Utc::now()).unwrap()
    }

    #[test]
    fn test_extract_wikilinks() {
        let content = r#"---
title: Test Note
---
# Heading

This links to [[other-note]] and [[another|with alias]].
Also [[path/to/note]] works, and [[other-note]] twice.
"#;
        let doc = parse(content);
        assert_eq!(doc.links, vec!["another", "other-note", "path/to/note"]);
    }

    #[test]
    fn test_extract_markdown_links() {
        let content = r#"# Note

See [this note](./other.md) for details.
Also [external](https://example.com "Example") is kept.
But ![image](./pic.png) is an embed.
"#;
        let doc = parse(content);
        assert_eq!(doc.links, vec!["./other.md", "https://example.com"]);
    }

    #[test]
    fn test_links_only_come_from_body() {
        let content = "---\nrelated: \"[[hidden]]\"\n---\nBody with [[shown]]";
        let doc = parse(content);
        assert_eq!(doc.links, vec!["shown"]);
    }

    #[test]
    fn test_tags_promoted_from_frontmatter() {
        let content = "---\ntags:\n  - project\n  - \"#Rust\"\n  - project\nstatus: active\n---\n";
        let doc = parse(content);
        assert_eq!(doc.tags, vec!["project", "Rust"]);
        assert_eq!(doc.front_matter["status"], vec!["active"]);
    }

    #[test]
    fn test_scalar_tag_is_wrapped() {
        let doc = parse("---\ntags: solo\n---\n");
        assert_eq!(doc.tags, vec!["solo"]);
    }

    #[test]
    fn test_extract_title_from_frontmatter() {
        let doc = parse("---\ntitle: My Title\n---\n# Heading\n");
        assert_eq!(doc.title, "My Title");
    }

    #[test]
    fn test_extract_title_from_heading() {
        let doc = parse("# First Heading\n\nContent here.");
        assert_eq!(doc.title, "First Heading");
    }

    #[test]
    fn test_extract_title_from_filename() {
        let doc = parse("No frontmatter, no heading.");
        assert_eq!(doc.title, "test");
    }

    #[test]
    fn test_wikilink_with_section() {
        let doc = parse("Link to [[note#section]] here.");
        assert_eq!(doc.links, vec!["note#section"]);
    }

    #[test]
    fn test_invalid_frontmatter_is_an_error() {
        let result = parse_document(
            PathBuf::from("/vault/bad.md"),
            "---\ntitle: [oops\n---\n",
            Utc::now(),
        );
        assert!(result.is_err());
    }
}
