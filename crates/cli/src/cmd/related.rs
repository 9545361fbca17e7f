//! Related command implementation.

use std::path::Path;

use super::output::{RelatedOutput, print_json};
use super::open_snapshot;
use crate::RelatedArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: RelatedArgs) {
    let session = open_snapshot(config, profile);
    let index = &session.index;

    let Some(path) = index.canonical(&args.note) else {
        eprintln!("Note not found in index: {}", args.note);
        std::process::exit(1);
    };
    let related = RelatedOutput::from_related(index.root(), &index.related(&path));

    if args.json {
        print_json(&related);
        return;
    }

    println!("=== Outbound ===");
    print_list(&related.outbound);
    println!();
    println!("=== Backlinks ===");
    print_list(&related.backlinks);
}

fn print_list(paths: &[String]) {
    if paths.is_empty() {
        println!("(none)");
    }
    for path in paths {
        println!("  {}", path);
    }
}
