//! In-memory vault index for structured queries and link resolution.
//!
//! This module provides:
//! - [`DocumentIndex`]: parsed notes keyed by canonical path, with search,
//!   link resolution and backlinks
//! - [`IndexService`]: staleness-aware snapshots and incremental updates
//!
//! # Example
//!
//! ```no_run
//! use vaultlens_core::index::{IndexConfig, IndexService, Query};
//! use std::path::Path;
//!
//! let service = IndexService::new(Path::new("/home/me/notes"), IndexConfig::default());
//! let index = service.acquire_snapshot().unwrap();
//!
//! let hits = index.search(&Query::term("rust").with_tag("project"));
//! for hit in hits {
//!     println!("{} ({})", hit.path.display(), hit.match_from);
//! }
//! ```

mod links;
pub mod search;
pub mod service;
pub mod store;
pub mod types;

pub use service::{DEFAULT_MAX_AGE, IndexService, ServiceError, ServiceStats};
pub use store::{DocumentIndex, IndexError};
pub use types::{Document, IndexConfig, MatchSource, Query, RelatedNotes, SearchResult};
