//! Depth-1 backlink neighbourhood around seed notes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::index::DocumentIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub path: PathBuf,
    pub outbound: Vec<PathBuf>,
    pub backlinks: Vec<PathBuf>,
}

/// Nodes keyed by canonical path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BacklinkGraph {
    pub nodes: BTreeMap<PathBuf, GraphNode>,
}

impl BacklinkGraph {
    pub fn get(&self, path: &Path) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn record(&mut self, index: &DocumentIndex, path: PathBuf) -> &GraphNode {
        self.nodes.entry(path).or_insert_with_key(|path| {
            let related = index.related(path);
            GraphNode {
                path: path.clone(),
                outbound: related.outbound,
                backlinks: related.backlinks,
            }
        })
    }
}

/// Expand seeds one hop along outbound links and backlinks.
///
/// Seeds that do not resolve to an indexed note are skipped. Every seed is
/// expanded once, even when an earlier seed already recorded it as a
/// neighbour. Neighbours get their own node but are not expanded further.
pub fn build_backlink_graph<P: AsRef<Path>>(
    index: Option<&DocumentIndex>,
    seeds: &[P],
) -> BacklinkGraph {
    let mut graph = BacklinkGraph::default();
    let Some(index) = index else {
        return graph;
    };

    let mut expanded = BTreeSet::new();
    for seed in seeds {
        let Some(seed) = index.canonical(&seed.as_ref().to_string_lossy()) else {
            continue;
        };
        if !expanded.insert(seed.clone()) {
            continue;
        }

        // A seed may already be present as a neighbour of an earlier seed.
        let node = graph.record(index, seed);
        let neighbours: Vec<PathBuf> =
            node.outbound.iter().chain(&node.backlinks).cloned().collect();
        for neighbour in neighbours {
            graph.record(index, neighbour);
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexConfig;
    use std::fs;
    use tempfile::TempDir;

    fn create_index() -> (TempDir, DocumentIndex) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("alpha.md"), "[[beta]]").unwrap();
        fs::write(root.join("beta.md"), "[[gamma]] [[alpha]]").unwrap();
        fs::write(root.join("gamma.md"), "[[delta]]").unwrap();
        fs::write(root.join("delta.md"), "end of the line").unwrap();

        let files = crate::vault::VaultWalker::new(root).unwrap().walk().unwrap();
        let mut index = DocumentIndex::new(root, IndexConfig::default());
        index.build(files.iter().map(|f| &f.absolute_path)).unwrap();
        (dir, index)
    }

    #[test]
    fn test_graph_from_single_seed() {
        let (dir, index) = create_index();
        let root = dir.path();
        let graph = build_backlink_graph(Some(&index), &["alpha"]);

        assert_eq!(graph.len(), 2);
        let alpha = graph.get(&root.join("alpha.md")).unwrap();
        assert_eq!(alpha.outbound, vec![root.join("beta.md")]);
        let beta = graph.get(&root.join("beta.md")).unwrap();
        assert_eq!(beta.backlinks, vec![root.join("alpha.md")]);
    }

    #[test]
    fn test_graph_stops_after_one_hop() {
        let (dir, index) = create_index();
        let root = dir.path();
        let graph = build_backlink_graph(Some(&index), &[root.join("beta.md")]);

        let paths: Vec<_> = graph.nodes.keys().cloned().collect();
        assert_eq!(paths, vec![root.join("alpha.md"), root.join("beta.md"), root.join("gamma.md")]);
        // gamma is a neighbour: recorded with its own edges, not expanded.
        assert_eq!(graph.get(&root.join("gamma.md")).unwrap().outbound, vec![root.join("delta.md")]);
        assert!(graph.get(&root.join("delta.md")).is_none());
    }

    #[test]
    fn test_seed_recorded_as_neighbour_is_still_expanded() {
        let (dir, index) = create_index();
        let root = dir.path();
        let graph = build_backlink_graph(Some(&index), &["alpha", "beta"]);

        let paths: Vec<_> = graph.nodes.keys().cloned().collect();
        assert_eq!(paths, vec![root.join("alpha.md"), root.join("beta.md"), root.join("gamma.md")]);
        assert!(graph.get(&root.join("delta.md")).is_none());
    }

    #[test]
    fn test_duplicate_and_unknown_seeds() {
        let (_dir, index) = create_index();
        let graph = build_backlink_graph(Some(&index), &["delta", "Delta", "missing"]);

        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_no_index_yields_empty_graph() {
        let graph = build_backlink_graph::<&str>(None, &["alpha"]);
        assert!(graph.is_empty());
    }
}
