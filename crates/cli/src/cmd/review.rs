//! Review command implementation.

use std::path::Path;

use chrono::Utc;
use vaultlens_core::review::{ResurfaceOptions, build_resurface_queue, filter_queue};

use super::output::{ReviewOutput, print_json, print_paths_quiet, print_review_table};
use super::{open_snapshot, parse_metadata, resolve_format};
use crate::{OutputFormat, ReviewArgs};

pub fn run(config: Option<&Path>, profile: Option<&str>, args: ReviewArgs) {
    let metadata = parse_metadata(&args.filters.metadata);
    let session = open_snapshot(config, profile);
    let (rc, index) = (&session.config, &session.index);

    let options = ResurfaceOptions {
        now: Utc::now(),
        minimum_age: rc.review.minimum_age,
        // Filters are applied after bucketing, so the limit is too.
        limit: 0,
        buckets: rc.review.buckets.clone(),
        ..Default::default()
    };
    let mut items = filter_queue(
        build_resurface_queue(index, &options),
        &args.filters.tags,
        &metadata,
    );

    let limit = args.limit.unwrap_or(rc.review.limit);
    if limit > 0 {
        items.truncate(limit);
    }

    let rows: Vec<ReviewOutput> =
        items.iter().map(|item| ReviewOutput::from_item(index.root(), item)).collect();

    match resolve_format(args.output, args.json) {
        OutputFormat::Table => print_review_table(&rows),
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Quiet => print_paths_quiet(rows.iter().map(|r| r.path.as_str())),
    }
}
