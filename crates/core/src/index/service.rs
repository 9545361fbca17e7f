//! Snapshot provider wrapping one [`DocumentIndex`] per vault.
//!
//! Full rebuilds run without holding the lock and are published by swapping
//! the finished index in, unless a rebuild that started later got there
//! first. Pending path updates are applied to the live index
//! under the write lock. Every caller receives its own clone.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;

use super::store::{DocumentIndex, IndexError};
use super::types::IndexConfig;
use crate::vault::{VaultWalker, VaultWalkerError, paths};

/// Default time after which a snapshot request triggers a full rebuild.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("index service is closed")]
    Closed,

    #[error("index has not been built")]
    Unavailable,

    #[error("failed to walk vault: {0}")]
    Walk(#[from] VaultWalkerError),

    #[error("failed to index vault: {0}")]
    Index(#[from] IndexError),

    #[error("failed to stat {path}: {source}")]
    Stat {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Point-in-time service counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// When the last full rebuild was published.
    pub last_rebuild: Option<DateTime<Utc>>,
    /// Number of queued path updates.
    pub pending: usize,
}

#[derive(Debug)]
struct ServiceState {
    index: DocumentIndex,
    pending: BTreeSet<String>,
    last_rebuild: Option<(Instant, DateTime<Utc>)>,
    /// Ticket of the rebuild currently published.
    published: u64,
    invalidated: bool,
    closed: bool,
}

/// Thread-safe owner of a vault's index.
#[derive(Debug)]
pub struct IndexService {
    root: PathBuf,
    config: IndexConfig,
    max_age: Duration,
    /// Last ticket handed to a rebuild. Tickets grow in walk start order.
    tickets: AtomicU64,
    state: RwLock<ServiceState>,
}

/// A finished rebuild waiting to be published.
#[derive(Debug)]
struct Rebuild {
    ticket: u64,
    index: DocumentIndex,
}

impl IndexService {
    /// Create a service with an empty, not yet built index.
    pub fn new(root: &Path, config: IndexConfig) -> Self {
        Self::with_max_age(root, config, DEFAULT_MAX_AGE)
    }

    pub fn with_max_age(root: &Path, config: IndexConfig, max_age: Duration) -> Self {
        let root = paths::absolute_root(root);
        let state = ServiceState {
            index: DocumentIndex::new(&root, config.clone()),
            pending: BTreeSet::new(),
            last_rebuild: None,
            published: 0,
            invalidated: false,
            closed: false,
        };
        Self { root, config, max_age, tickets: AtomicU64::new(0), state: RwLock::new(state) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return a private copy of an up-to-date index.
    ///
    /// Rebuilds when the index was never built or is older than the
    /// configured max age, then applies queued updates.
    pub fn acquire_snapshot(&self) -> Result<DocumentIndex, ServiceError> {
        let needs_rebuild = {
            let state = self.state.read();
            if state.closed {
                return Err(ServiceError::Closed);
            }
            let needs_rebuild = self.is_stale(&state);
            if !needs_rebuild && state.pending.is_empty() {
                tracing::debug!("serving cached index snapshot");
                return Ok(state.index.snapshot());
            }
            needs_rebuild
        };

        if needs_rebuild {
            let fresh = self.rebuild()?;
            let mut state = self.state.write();
            if state.closed {
                return Err(ServiceError::Closed);
            }
            Self::publish(&mut state, fresh);
        }

        let mut state = self.state.write();
        if state.closed {
            return Err(ServiceError::Closed);
        }
        if state.last_rebuild.is_none() {
            return Err(ServiceError::Unavailable);
        }
        Self::apply_pending(&self.root, &mut state)?;
        Ok(state.index.snapshot())
    }

    /// Queue a vault-relative path for re-indexing on the next snapshot.
    pub fn queue_update(&self, relative_path: &str) {
        let normalized = relative_path.trim().replace('\\', "/");
        if normalized.is_empty() {
            return;
        }

        let mut state = self.state.write();
        if state.closed {
            return;
        }
        state.pending.insert(normalized);
    }

    /// Force a full rebuild on the next snapshot request.
    pub fn invalidate(&self) {
        self.state.write().invalidated = true;
    }

    pub fn stats(&self) -> ServiceStats {
        let state = self.state.read();
        ServiceStats {
            last_rebuild: state.last_rebuild.map(|(_, at)| at),
            pending: state.pending.len(),
        }
    }

    /// Shut the service down and release the index. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.write();
        if state.closed {
            return;
        }
        state.closed = true;
        state.index = DocumentIndex::new(&self.root, self.config.clone());
        state.pending.clear();
        tracing::debug!("index service for {} closed", self.root.display());
    }

    fn is_stale(&self, state: &ServiceState) -> bool {
        match state.last_rebuild {
            None => true,
            Some((built, _)) => state.invalidated || built.elapsed() > self.max_age,
        }
    }

    fn rebuild(&self) -> Result<Rebuild, ServiceError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        let files = VaultWalker::with_ignored(&self.root, &self.config.ignored_folders)?.walk()?;

        let mut index = DocumentIndex::new(&self.root, self.config.clone());
        index.build(files.iter().map(|f| &f.absolute_path))?;

        tracing::info!(
            "indexed {} notes in {} in {}ms",
            index.len(),
            self.root.display(),
            started.elapsed().as_millis()
        );
        Ok(Rebuild { ticket, index })
    }

    /// Swap a finished rebuild in unless one that started later already
    /// landed. Returns whether it was published.
    fn publish(state: &mut ServiceState, rebuild: Rebuild) -> bool {
        if rebuild.ticket <= state.published {
            tracing::debug!(
                "dropping rebuild {} superseded by rebuild {}",
                rebuild.ticket,
                state.published
            );
            return false;
        }
        state.index = rebuild.index;
        state.published = rebuild.ticket;
        state.last_rebuild = Some((Instant::now(), Utc::now()));
        state.invalidated = false;
        true
    }

    fn apply_pending(root: &Path, state: &mut ServiceState) -> Result<(), ServiceError> {
        let queued: Vec<String> = std::mem::take(&mut state.pending).into_iter().collect();

        for (i, relative) in queued.iter().enumerate() {
            if let Err(e) = Self::apply_one(root, &mut state.index, relative) {
                tracing::warn!("applying queued update for {relative} failed: {e}");
                state.pending.extend(queued[i..].iter().cloned());
                return Err(e);
            }
        }
        Ok(())
    }

    fn apply_one(
        root: &Path,
        index: &mut DocumentIndex,
        relative: &str,
    ) -> Result<(), ServiceError> {
        let path = paths::canonical_key(root, Path::new(relative));

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("removing {} (gone)", path.display());
                index.remove(&path);
                return Ok(());
            }
            Err(source) => {
                return Err(ServiceError::Stat { path: path.display().to_string(), source });
            }
        };

        if metadata.is_dir() {
            tracing::debug!("removing notes under {}", path.display());
            index.remove(&path);
            return Ok(());
        }

        let rel = path.strip_prefix(root).unwrap_or(&path);
        if !paths::is_markdown_file(&path) || paths::is_hidden(rel) {
            return Ok(());
        }

        match index.update(&path) {
            Ok(()) => {
                tracing::debug!("updated {}", path.display());
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                index.remove(&path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
