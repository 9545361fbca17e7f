//! In-memory document index keyed by canonical path.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::links::{LinkGraph, Resolver};
use super::types::{Document, IndexConfig, RelatedNotes};
use crate::frontmatter::FrontmatterParseError;
use crate::vault::{parse_document, paths};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read note {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse frontmatter in {path}: {source}")]
    Frontmatter {
        path: String,
        #[source]
        source: FrontmatterParseError,
    },
}

impl IndexError {
    /// Whether the note disappeared before it could be read.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Map from canonical note path to parsed document.
///
/// The index does no locking of its own; [`super::IndexService`] serialises
/// writers. `Clone` produces a fully independent copy.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    root: PathBuf,
    config: IndexConfig,
    docs: BTreeMap<PathBuf, Document>,
}

impl DocumentIndex {
    /// Create an empty index for the vault at `root`.
    pub fn new(root: &Path, config: IndexConfig) -> Self {
        Self { root: paths::absolute_root(root), config, docs: BTreeMap::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Document> {
        self.docs.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.docs.contains_key(path)
    }

    /// Documents in path order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.docs.values()
    }

    /// Index keys in path order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.docs.keys().map(PathBuf::as_path)
    }

    /// Replace the whole index with the given files.
    ///
    /// Files under ignored folders are skipped, as are files that vanished
    /// since they were listed. Any other failure aborts the build and leaves
    /// the index unchanged.
    pub fn build<I, P>(&mut self, files: I) -> Result<(), IndexError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut docs = BTreeMap::new();

        for file in files {
            let key = paths::canonical_key(&self.root, file.as_ref());
            if paths::is_ignored(&self.root, &key, &self.config.ignored_folders) {
                continue;
            }

            match load_document(&key) {
                Ok(doc) => {
                    docs.insert(key, doc);
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!("skipping vanished note {}", key.display());
                }
                Err(e) => return Err(e),
            }
        }

        self.docs = docs;
        Ok(())
    }

    /// Re-parse a single note and upsert it.
    ///
    /// Fails with a not-found [`IndexError`] when the file has disappeared;
    /// on any failure the index keeps its previous state.
    pub fn update(&mut self, path: &Path) -> Result<(), IndexError> {
        let key = paths::canonical_key(&self.root, path);
        if paths::is_ignored(&self.root, &key, &self.config.ignored_folders) {
            return Ok(());
        }

        let doc = load_document(&key)?;
        self.docs.insert(key, doc);
        Ok(())
    }

    /// Drop a note, or every note under `path` when it names a directory.
    pub fn remove(&mut self, path: &Path) {
        let key = paths::canonical_key(&self.root, path);
        self.docs.retain(|doc_path, _| !doc_path.starts_with(&key));
    }

    /// Resolve a link target or bare note title to an index key.
    pub fn canonical(&self, reference: &str) -> Option<PathBuf> {
        Resolver::new(self).resolve(reference)
    }

    /// Outbound links and backlinks of a note. Unknown notes yield an empty
    /// result.
    pub fn related(&self, path: impl AsRef<Path>) -> RelatedNotes {
        let reference = path.as_ref().to_string_lossy();
        match self.canonical(&reference) {
            Some(key) => LinkGraph::build(self).related(&key),
            None => RelatedNotes::default(),
        }
    }

    /// Independent copy for handing to readers.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

fn load_document(path: &Path) -> Result<Document, IndexError> {
    let read_err = |source| IndexError::Read { path: path.display().to_string(), source };

    let bytes = fs::read(path).map_err(read_err)?;
    let modified: DateTime<Utc> = fs::metadata(path)
        .map_err(read_err)?
        .modified()
        .map(Into::into)
        .unwrap_or(DateTime::UNIX_EPOCH);

    let content = String::from_utf8_lossy(&bytes);
    parse_document(path.to_path_buf(), &content, modified).map_err(|source| {
        IndexError::Frontmatter { path: path.display().to_string(), source }
    })
}
