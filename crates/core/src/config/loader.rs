use crate::config::types::{
    ConfigFile, LoggingConfig, Profile, ResolvedConfig, ReviewConfig, ReviewSettings,
};
use crate::index::{DEFAULT_MAX_AGE, IndexConfig};
use crate::review::Bucket;
use chrono::TimeDelta;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("invalid duration '{0}' (expected e.g. 30m, 12h, 7d)")]
    BadDuration(String),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        Self::resolve_profile(&active, prof, &cf.logging, &cf.review)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        log_cfg: &LoggingConfig,
        review_cfg: &ReviewConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let vault_root = expand_path(&prof.vault_root)?;
        let sub = |s: &str| s.replace("{{vault_root}}", &vault_root.to_string_lossy());

        let max_age = match &prof.max_age {
            Some(raw) => parse_duration(raw)?,
            None => DEFAULT_MAX_AGE,
        };

        // Resolve log file path if present
        let logging = if let Some(ref file) = log_cfg.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expanded_file),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            index: IndexConfig {
                enable_body: prof.enable_body,
                ignored_folders: prof.ignored_folders.clone(),
            },
            vault_root,
            max_age,
            logging,
            review: resolve_review(review_cfg)?,
        })
    }
}

fn resolve_review(cfg: &ReviewConfig) -> Result<ReviewSettings, ConfigError> {
    let minimum_age = match &cfg.minimum_age {
        Some(raw) => to_delta(raw)?,
        None => TimeDelta::zero(),
    };

    let buckets = if cfg.buckets.is_empty() {
        Bucket::default_ladder()
    } else {
        cfg.buckets
            .iter()
            .map(|b| Ok(Bucket::new(b.name.clone(), to_delta(&b.after)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?
    };

    Ok(ReviewSettings { minimum_age, limit: cfg.limit, buckets })
}

fn to_delta(raw: &str) -> Result<TimeDelta, ConfigError> {
    TimeDelta::from_std(parse_duration(raw)?)
        .map_err(|_| ConfigError::BadDuration(raw.to_string()))
}

/// Parse `<n><unit>` with units `s`, `m`, `h`, `d` or `w`.
pub fn parse_duration(raw: &str) -> Result<Duration, ConfigError> {
    let bad = || ConfigError::BadDuration(raw.to_string());
    let trimmed = raw.trim();
    let split = trimmed.find(|c: char| !c.is_ascii_digit()).ok_or_else(bad)?;
    let (amount, unit) = trimmed.split_at(split);

    let amount: u64 = amount.parse().map_err(|_| bad())?;
    let seconds = match unit.trim() {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return Err(bad()),
    };
    amount.checked_mul(seconds).map(Duration::from_secs).ok_or_else(bad)
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("vaultlens").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("vaultlens").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
