//! User configuration read from `~/.onsong-library/config.toml`.
//!
//! Every field is optional; a missing file means defaults everywhere.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::picker::TypeFilter;
use crate::store::default_db_path;
use crate::ui::Theme;

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file holding the library. Defaults to `~/.onsong-library/library.sqlite`.
    pub storage_path: Option<PathBuf>,
    /// Directory for the log file. Defaults to `~/.onsong-library/logs`.
    pub log_dir: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Quiet period before an edit is written; 0 writes on every keystroke.
    pub edit_debounce_ms: u64,
    pub theme: Theme,
    /// Extensions offered by the file browser. Empty means any file.
    pub import_extensions: Vec<String>,
    /// Directory the file browser opens in. Defaults to the working directory.
    pub browse_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            log_dir: None,
            log_filter: "info".to_string(),
            edit_debounce_ms: 500,
            theme: Theme::Dark,
            import_extensions: Vec::new(),
            browse_dir: None,
        }
    }
}

impl AppConfig {
    /// Load the config at `path`, falling back to defaults when the file does
    /// not exist. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse TOML configuration")
    }

    /// Where the config lives when `--config` is not given.
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::store::data_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn storage_path(&self) -> Result<PathBuf> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(crate::store::data_dir()?.join(LOG_DIR_NAME)),
        }
    }

    pub fn edit_debounce(&self) -> Duration {
        Duration::from_millis(self.edit_debounce_ms)
    }

    pub fn type_filter(&self) -> TypeFilter {
        TypeFilter::from_extensions(&self.import_extensions)
    }

    pub fn browse_dir(&self) -> PathBuf {
        self.browse_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
