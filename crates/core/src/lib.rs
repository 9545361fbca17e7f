#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Markdown vault indexing, resurfacing and backlink graphs.
//!
//! The [`index::DocumentIndex`] parses a tree of notes into an in-memory map,
//! [`index::IndexService`] hands out isolated snapshots of it, and the
//! [`review`] module turns a snapshot into a resurfacing queue or a
//! one-hop backlink neighbourhood.

pub mod config;
pub mod frontmatter;
pub mod index;
pub mod review;
pub mod vault;
