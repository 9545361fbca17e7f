//! Configuration file loading.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, parse_duration};
pub use types::{ConfigFile, LoggingConfig, Profile, ResolvedConfig, ReviewSettings};
