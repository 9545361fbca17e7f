//! Link target resolution and the derived backlink graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::store::DocumentIndex;
use super::types::RelatedNotes;
use crate::vault::paths;

/// Resolves raw link targets and note titles to index keys.
///
/// Exact path matches win. Otherwise the filename stem is compared
/// case-insensitively; when several documents share a stem, the
/// lexicographically first path is chosen.
pub(crate) struct Resolver<'a> {
    index: &'a DocumentIndex,
    stems: HashMap<String, &'a Path>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(index: &'a DocumentIndex) -> Self {
        let mut stems = HashMap::new();
        // Documents iterate in path order, so the first insert wins ties.
        for path in index.paths() {
            let name = path.file_name().map(|n| n.to_string_lossy());
            if let Some(stem) = name.and_then(|n| paths::note_stem(&n)) {
                stems.entry(stem).or_insert(path);
            }
        }
        Self { index, stems }
    }

    pub(crate) fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let reference = reference.trim();
        if let Some(path) = self.by_path(reference) {
            return Some(path);
        }

        // Only now treat `#` as the start of a heading anchor.
        let target = reference.split('#').next().unwrap_or("").trim();
        if target.is_empty() {
            return None;
        }
        if target != reference {
            let path = self.by_path(target);
            if path.is_some() {
                return path;
            }
        }

        let stem = paths::note_stem(target)?;
        self.stems.get(&stem).map(|p| p.to_path_buf())
    }

    /// Exact key match, then the same path with `.md` appended.
    fn by_path(&self, target: &str) -> Option<PathBuf> {
        if target.is_empty() {
            return None;
        }

        let candidate = paths::canonical_key(self.index.root(), Path::new(target));
        if self.index.contains(&candidate) {
            return Some(candidate);
        }

        if paths::is_markdown_file(&candidate) {
            return None;
        }
        let mut with_ext = OsString::from(candidate.as_os_str());
        with_ext.push(".md");
        let with_ext = PathBuf::from(with_ext);
        self.index.contains(&with_ext).then_some(with_ext)
    }
}

/// Resolved outbound edges for every document plus their reverse.
pub(crate) struct LinkGraph {
    outbound: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    backlinks: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
}

impl LinkGraph {
    /// Scan all documents once and resolve their links.
    pub(crate) fn build(index: &DocumentIndex) -> Self {
        let resolver = Resolver::new(index);
        let mut outbound: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();
        let mut backlinks: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();

        for doc in index.documents() {
            let targets: BTreeSet<PathBuf> =
                doc.links.iter().filter_map(|link| resolver.resolve(link)).collect();

            for target in &targets {
                if *target != doc.path {
                    backlinks.entry(target.clone()).or_default().insert(doc.path.clone());
                }
            }
            outbound.insert(doc.path.clone(), targets);
        }

        Self { outbound, backlinks }
    }

    pub(crate) fn related(&self, path: &Path) -> RelatedNotes {
        let collect = |map: &BTreeMap<PathBuf, BTreeSet<PathBuf>>| -> Vec<PathBuf> {
            map.get(path).map(|set| set.iter().cloned().collect()).unwrap_or_default()
        };
        RelatedNotes { outbound: collect(&self.outbound), backlinks: collect(&self.backlinks) }
    }
}
