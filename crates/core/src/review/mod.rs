//! Review helpers computed from an index snapshot.
//!
//! - [`resurface`]: age-bucketed queue of notes due for another look
//! - [`graph`]: one-hop backlink neighbourhood around a set of notes

pub mod graph;
pub mod resurface;

pub use graph::{BacklinkGraph, GraphNode, build_backlink_graph};
pub use resurface::{
    Bucket, ResurfaceItem, ResurfaceOptions, build_resurface_queue, filter_queue,
};
