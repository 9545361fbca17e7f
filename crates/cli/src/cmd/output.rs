//! Shared output formatting for query commands.

use std::path::Path;

use serde::Serialize;
use vaultlens_core::index::{RelatedNotes, SearchResult};
use vaultlens_core::review::{BacklinkGraph, ResurfaceItem};

use super::display_path;

/// Formatted search hit for JSON output.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub path: String,
    pub match_from: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub snippet: String,
    pub outbound: Vec<String>,
    pub backlinks: Vec<String>,
}

impl SearchOutput {
    pub fn from_result(root: &Path, result: &SearchResult) -> Self {
        let related = RelatedOutput::from_related(root, &result.related);
        Self {
            path: display_path(root, &result.path),
            match_from: result.match_from.to_string(),
            snippet: result.snippet.clone(),
            outbound: related.outbound,
            backlinks: related.backlinks,
        }
    }
}

/// Formatted link neighbourhood for JSON output.
#[derive(Debug, Serialize)]
pub struct RelatedOutput {
    pub outbound: Vec<String>,
    pub backlinks: Vec<String>,
}

impl RelatedOutput {
    pub fn from_related(root: &Path, related: &RelatedNotes) -> Self {
        let rel = |paths: &[std::path::PathBuf]| -> Vec<String> {
            paths.iter().map(|p| display_path(root, p)).collect()
        };
        Self { outbound: rel(&related.outbound), backlinks: rel(&related.backlinks) }
    }
}

/// Formatted review item for JSON output.
#[derive(Debug, Serialize)]
pub struct ReviewOutput {
    pub path: String,
    pub title: String,
    pub bucket: String,
    pub age_days: i64,
    pub modified: String,
    pub tags: Vec<String>,
}

impl ReviewOutput {
    pub fn from_item(root: &Path, item: &ResurfaceItem) -> Self {
        Self {
            path: display_path(root, &item.path),
            title: item.title.clone(),
            bucket: item.bucket.clone(),
            age_days: item.age.num_days(),
            modified: item.modified_at.format("%Y-%m-%d %H:%M").to_string(),
            tags: item.tags.clone(),
        }
    }
}

/// Formatted graph node for JSON output.
#[derive(Debug, Serialize)]
pub struct GraphNodeOutput {
    pub path: String,
    pub outbound: Vec<String>,
    pub backlinks: Vec<String>,
}

pub fn graph_nodes(root: &Path, graph: &BacklinkGraph) -> Vec<GraphNodeOutput> {
    graph
        .nodes
        .values()
        .map(|node| {
            let related = RelatedOutput::from_related(
                root,
                &RelatedNotes {
                    outbound: node.outbound.clone(),
                    backlinks: node.backlinks.clone(),
                },
            );
            GraphNodeOutput {
                path: display_path(root, &node.path),
                outbound: related.outbound,
                backlinks: related.backlinks,
            }
        })
        .collect()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print search hits as a table.
pub fn print_search_table(hits: &[SearchOutput]) {
    if hits.is_empty() {
        println!("(no notes found)");
        return;
    }

    let path_width = hits.iter().map(|h| h.path.len()).max().unwrap_or(4).clamp(4, 50);
    let source_width = 11; // "frontmatter" is longest

    println!("{:<path_width$}  {:<source_width$}  SNIPPET", "PATH", "MATCH");
    println!("{:-<path_width$}  {:-<source_width$}  {:-<7}", "", "", "");
    for hit in hits {
        println!("{:<path_width$}  {:<source_width$}  {}", hit.path, hit.match_from, hit.snippet);
    }
}

/// Print review items as a table.
pub fn print_review_table(items: &[ReviewOutput]) {
    if items.is_empty() {
        println!("(nothing to review)");
        return;
    }

    let path_width = items.iter().map(|i| i.path.len()).max().unwrap_or(4).clamp(4, 50);
    let bucket_width = items.iter().map(|i| i.bucket.len()).max().unwrap_or(6).max(6);

    println!("{:<path_width$}  {:<bucket_width$}  {:>5}  MODIFIED", "PATH", "BUCKET", "DAYS");
    println!("{:-<path_width$}  {:-<bucket_width$}  {:->5}  {:-<16}", "", "", "", "");
    for item in items {
        println!(
            "{:<path_width$}  {:<bucket_width$}  {:>5}  {}",
            item.path, item.bucket, item.age_days, item.modified
        );
    }
}

/// Print paths only, one per line.
pub fn print_paths_quiet<'a>(paths: impl IntoIterator<Item = &'a str>) {
    for path in paths {
        println!("{}", path);
    }
}
