//! Application configuration
//!
//! Read from `$KARMA_CONFIG_PATH` or `<config dir>/karma/config.toml`. A
//! missing file means defaults.

use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KarmaError, Result};

pub const DB_PATH_ENV: &str = "KARMA_DB_PATH";
pub const CONFIG_PATH_ENV: &str = "KARMA_CONFIG_PATH";
pub const LOG_ENV: &str = "KARMA_LOG";

const APP_DIR: &str = "karma";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Task database file.
    pub db_path: Option<PathBuf>,
    /// Directory for `karma.log`.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Load the config at `path`, or the default location when `None`.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(Self::default_path, Path::to_path_buf);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| KarmaError::Config(format!("{}: {e}", path.display())))
    }

    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Pick the database path: `cli` flag, then `$KARMA_DB_PATH`, then the
    /// config file, then the platform data directory.
    pub fn resolve_db_path(&self, cli: Option<&Path>) -> PathBuf {
        self.pick_db_path(cli, std::env::var_os(DB_PATH_ENV))
    }

    fn pick_db_path(&self, cli: Option<&Path>, env: Option<OsString>) -> PathBuf {
        if let Some(path) = cli {
            return path.to_path_buf();
        }
        if let Some(path) = env {
            return PathBuf::from(path);
        }
        if let Some(path) = &self.db_path {
            return path.clone();
        }
        data_dir().join("karma.db")
    }

    pub fn resolve_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(data_dir)
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
