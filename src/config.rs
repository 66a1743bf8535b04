//! Configuration for TreeStore
//!
//! Centralized configuration with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Main configuration for a TreeStore instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the store
    /// Internal structure:
    ///   {root_dir}/
    ///     ├── list             (listing log)
    ///     └── a/b/c/value.fts  (one directory per encoded key character)
    pub root_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Listing Log Configuration
    // -------------------------------------------------------------------------
    /// How often the listing log is fsynced
    pub log_sync: LogSyncStrategy,

    /// Rewrite the listing log every time `list` is called
    pub compact_on_list: bool,

    /// Compact automatically once this many superseded lines pile up
    pub compact_threshold: Option<usize>,
}

/// Listing log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogSyncStrategy {
    /// fsync after every appended line (safest, slowest)
    EveryWrite,

    /// Leave flushing to the OS page cache
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./treestore_data"),
            log_sync: LogSyncStrategy::OsBuffered,
            compact_on_list: true,
            compact_threshold: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a config from a JSON document; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store root directory
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the listing log sync strategy
    pub fn log_sync(mut self, strategy: LogSyncStrategy) -> Self {
        self.config.log_sync = strategy;
        self
    }

    /// Enable or disable compaction as a side effect of `list`
    pub fn compact_on_list(mut self, enabled: bool) -> Self {
        self.config.compact_on_list = enabled;
        self
    }

    /// Set the superseded-line count that triggers automatic compaction
    pub fn compact_threshold(mut self, lines: Option<usize>) -> Self {
        self.config.compact_threshold = lines;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
