//! Log output for `vlens`: human-readable events on stderr and an optional
//! append-only diagnostics file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use vaultlens_core::config::LoggingConfig;

/// Overrides the configured level with full filter directives,
/// e.g. `VLENS_LOG=vaultlens_core::index=trace`.
const ENV_VAR: &str = "VLENS_LOG";

/// Flushes the log file when dropped.
#[must_use]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber described by the `[logging]` section.
pub fn init(cfg: &LoggingConfig) -> io::Result<LogGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .with_target(false)
        .without_time()
        .with_filter(filter_for(&cfg.level, LevelFilter::INFO));

    let Some(path) = cfg.file.as_deref() else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(LogGuard { _file: None });
    };

    let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
    let file_level = cfg.file_level.as_deref().unwrap_or(&cfg.level);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter_for(file_level, LevelFilter::DEBUG));

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).init();
    Ok(LogGuard { _file: Some(guard) })
}

fn filter_for(level: &str, fallback: LevelFilter) -> EnvFilter {
    let level = parse_level(level).unwrap_or(fallback);
    EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(ENV_VAR)
        .from_env_lossy()
}

/// Open the log file for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}
