//! Search command implementation.

use std::path::Path;

use vaultlens_core::index::Query;

use super::output::{SearchOutput, print_json, print_paths_quiet, print_search_table};
use super::{open_snapshot, parse_metadata, resolve_format};
use crate::{OutputFormat, SearchArgs};

pub fn run(config: Option<&Path>, profile: Option<&str>, args: SearchArgs) {
    let query = Query {
        term: args.term.unwrap_or_default(),
        tags: args.filters.tags,
        metadata: parse_metadata(&args.filters.metadata),
    };

    let session = open_snapshot(config, profile);
    let index = &session.index;
    let hits: Vec<SearchOutput> = index
        .search(&query)
        .iter()
        .map(|r| SearchOutput::from_result(index.root(), r))
        .collect();

    tracing::debug!("search matched {} notes", hits.len());

    match resolve_format(args.output, args.json) {
        OutputFormat::Table => print_search_table(&hits),
        OutputFormat::Json => print_json(&hits),
        OutputFormat::Quiet => print_paths_quiet(hits.iter().map(|h| h.path.as_str())),
    }
}
