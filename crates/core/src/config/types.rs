use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::index::IndexConfig;
use crate::review::Bucket;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Folder names skipped at any depth while indexing (case-insensitive).
    #[serde(default)]
    pub ignored_folders: Vec<String>,
    /// Whether free-text search scans note bodies.
    #[serde(default = "default_enable_body")]
    pub enable_body: bool,
    /// Index staleness threshold, e.g. "1h" or "30m".
    pub max_age: Option<String>,
}

fn default_enable_body() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resurfacing defaults as written in the config file.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ReviewConfig {
    #[serde(default)]
    pub minimum_age: Option<String>,
    #[serde(default)]
    pub limit: usize,
    /// Custom ladder; the built-in one is used when empty.
    #[serde(default)]
    pub buckets: Vec<BucketConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BucketConfig {
    pub name: String,
    pub after: String,
}

/// Resurfacing defaults with durations parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    pub minimum_age: TimeDelta,
    pub limit: usize,
    pub buckets: Vec<Bucket>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self { minimum_age: TimeDelta::zero(), limit: 0, buckets: Bucket::default_ladder() }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    pub index: IndexConfig,
    pub max_age: Duration,
    pub logging: LoggingConfig,
    pub review: ReviewSettings,
}
