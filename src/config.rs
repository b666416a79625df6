//! User configuration (`config.toml`)
//!
//! Looked up at `$FOLIO_CONFIG` if set, otherwise
//! `<config_home>/folio/config.toml`. A missing file means defaults.
//!
//! ```toml
//! db_path = "/home/me/portfolios.db"
//! log_level = "info"
//! default_period = "YTD"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Database file; `~/.folio/data.db` when unset
    pub db_path: Option<PathBuf>,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Period used by `performance show` when none is given
    pub default_period: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: "warn".to_string(),
            default_period: "YTD".to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Where the config file is expected to be
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dir_spec::config_home().map(|dir| dir.join("folio").join("config.toml"))
}
