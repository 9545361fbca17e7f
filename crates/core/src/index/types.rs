//! Index data types for vault documents, queries and results.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indexing behaviour shared by builds and incremental updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Whether free-text search also scans note bodies.
    pub enable_body: bool,
    /// Folder names skipped at any depth, matched case-insensitively.
    pub ignored_folders: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { enable_body: true, ignored_folders: Vec::new() }
    }
}

/// A parsed note stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Canonical absolute path; always equal to the index key.
    pub path: PathBuf,
    /// Title from frontmatter, first heading or filename.
    pub title: String,
    /// Tags promoted from the frontmatter `tags` field.
    pub tags: Vec<String>,
    /// Frontmatter fields flattened to string lists.
    pub front_matter: BTreeMap<String, Vec<String>>,
    /// Sorted, deduplicated raw link targets found in the body.
    pub links: Vec<String>,
    /// Text after the frontmatter block.
    #[serde(skip)]
    pub body: String,
    /// File modification time.
    pub modified: DateTime<Utc>,
}

/// Structured search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Free-text term; empty means filters only.
    pub term: String,
    /// Tags that must all be present.
    pub tags: Vec<String>,
    /// Frontmatter fields that must contain every listed value.
    pub metadata: BTreeMap<String, Vec<String>>,
}

impl Query {
    pub fn term(term: impl Into<String>) -> Self {
        Self { term: term.into(), ..Default::default() }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.entry(key.into()).or_default().push(value.into());
        self
    }
}

/// Where a search result matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Filters only, no free-text term.
    Metadata,
    /// A frontmatter value contained the term.
    Frontmatter,
    /// A link target contained the term.
    Links,
    /// The body contained the term.
    Body,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Frontmatter => "frontmatter",
            Self::Links => "links",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved link neighbourhood of a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelatedNotes {
    /// Documents this one links to.
    pub outbound: Vec<PathBuf>,
    /// Documents linking to this one.
    pub backlinks: Vec<PathBuf>,
}

impl RelatedNotes {
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.backlinks.is_empty()
    }
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub path: PathBuf,
    pub snippet: String,
    pub match_from: MatchSource,
    /// Reserved for ranking; always zero for now.
    pub score: f64,
    pub related: RelatedNotes,
}
