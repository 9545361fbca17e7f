//! Graph command implementation.

use std::path::Path;

use vaultlens_core::review::build_backlink_graph;

use super::output::{graph_nodes, print_json};
use super::open_snapshot;
use crate::GraphArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: GraphArgs) {
    let session = open_snapshot(config, profile);
    let index = &session.index;
    let graph = build_backlink_graph(Some(index), &args.seeds);

    if graph.is_empty() {
        eprintln!("None of the seed notes were found in the index");
        std::process::exit(1);
    }

    let nodes = graph_nodes(index.root(), &graph);
    if args.json {
        print_json(&nodes);
        return;
    }

    for node in &nodes {
        println!("{}", node.path);
        for target in &node.outbound {
            println!("  -> {}", target);
        }
        for source in &node.backlinks {
            println!("  <- {}", source);
        }
    }
}
