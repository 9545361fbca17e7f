//! Vault file discovery and content extraction.
//!
//! This module provides utilities for walking vault directories,
//! normalising note paths and parsing markdown files into documents.

pub mod extractor;
pub mod paths;
pub mod walker;

pub use extractor::{extract_links, extract_tags, parse_document};
pub use walker::{VaultWalker, VaultWalkerError, WalkedFile};
