pub mod graph;
pub mod output;
pub mod related;
pub mod review;
pub mod search;

use std::collections::BTreeMap;
use std::path::Path;

use vaultlens_core::config::{ConfigLoader, ResolvedConfig};
use vaultlens_core::index::{DocumentIndex, IndexService};

use crate::OutputFormat;
use crate::logging::{self, LogGuard};

/// Everything a query command needs: resolved config, one index snapshot
/// and the log guard, which flushes the log file when the command ends.
pub struct Session {
    pub config: ResolvedConfig,
    pub index: DocumentIndex,
    _log: LogGuard,
}

/// Load config, start logging and take one index snapshot, exiting on error.
pub fn open_snapshot(config: Option<&Path>, profile: Option<&str>) -> Session {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let log = match logging::init(&rc.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error opening log file: {}", e);
            std::process::exit(1);
        }
    };

    let service = IndexService::with_max_age(&rc.vault_root, rc.index.clone(), rc.max_age);
    let index = match service.acquire_snapshot() {
        Ok(index) => index,
        Err(e) => {
            eprintln!("Error indexing vault {}: {}", rc.vault_root.display(), e);
            std::process::exit(1);
        }
    };
    service.close();

    Session { config: rc, index, _log: log }
}

/// Parse repeated `key=value` arguments into a filter map.
pub fn parse_metadata(pairs: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut metadata: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                metadata
                    .entry(key.trim().to_string())
                    .or_default()
                    .push(value.trim().to_string());
            }
            _ => {
                eprintln!("Invalid --meta '{}': expected key=value", pair);
                std::process::exit(2);
            }
        }
    }
    metadata
}

pub fn resolve_format(output: OutputFormat, json: bool) -> OutputFormat {
    if json { OutputFormat::Json } else { output }
}

/// Display a note path relative to the vault root.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy().to_string()
}
