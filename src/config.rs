use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const HOME_ENV: &str = "LIFTPLAN_HOME";
pub const LOG_ENV: &str = "LIFTPLAN_LOG";
const CONFIG_FILE: &str = "liftplan.toml";
const DB_FILE: &str = "liftplan.db";
const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_REPAIR_DELAY_MS: u64 = 0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
    #[error("unable to resolve data directory; set {HOME_ENV} or --home")]
    NoHome,
}

/// Process-wide settings, built once in `main` and handed to whoever needs them.
#[derive(Clone, Debug)]
pub struct Config {
    pub home: PathBuf,
    pub db_path: PathBuf,
    pub log_filter: String,
    pub repair: RepairConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepairConfig {
    pub enabled: bool,
    pub delay_ms: u64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: DEFAULT_REPAIR_DELAY_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    db_path: Option<PathBuf>,
    log_filter: Option<String>,
    #[serde(default)]
    repair: FileRepairSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRepairSection {
    enabled: Option<bool>,
    delay_ms: Option<u64>,
}

impl Config {
    /// Defaults rooted at `home`, before any file or environment overrides.
    pub fn from_home(home: PathBuf) -> Self {
        let db_path = home.join(DB_FILE);
        Self {
            home,
            db_path,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            repair: RepairConfig::default(),
        }
    }

    /// Resolves the data directory (flag, then `LIFTPLAN_HOME`, then
    /// `$HOME/.liftplan`), layers `liftplan.toml` from it when present and
    /// finally applies `LIFTPLAN_LOG`.
    pub fn load(home_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        let home = resolve_home(home_flag)?;
        let mut config = Self::from_home(home);
        let file_path = config.home.join(CONFIG_FILE);
        if file_path.is_file() {
            config.apply_file(&file_path)?;
        }
        if let Ok(filter) = std::env::var(LOG_ENV) {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })?;
        self.merge(file);
        Ok(())
    }

    fn merge(&mut self, file: FileConfig) {
        if let Some(db_path) = file.db_path {
            self.db_path = if db_path.is_absolute() {
                db_path
            } else {
                self.home.join(db_path)
            };
        }
        if let Some(filter) = file.log_filter {
            self.log_filter = filter;
        }
        if let Some(enabled) = file.repair.enabled {
            self.repair.enabled = enabled;
        }
        if let Some(delay_ms) = file.repair.delay_ms {
            self.repair.delay_ms = delay_ms;
        }
    }
}

fn resolve_home(home_flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(home) = home_flag {
        return Ok(home);
    }
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home).join(".liftplan"));
    }
    Err(ConfigError::NoHome)
}
