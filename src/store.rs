//! Store Module
//!
//! The store engine that coordinates all components.
//!
//! ## Responsibilities
//! - Validate keys before touching the filesystem
//! - Write value files into the directory trie, then journal them
//! - Prune dead branches on removal
//! - Serve listings from the replayed listing log

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::codec::{self, Value};
use crate::config::{Config, LogSyncStrategy};
use crate::error::{Result, StoreError};
use crate::key;
use crate::listing::{ListingLog, Marker};
use crate::trie;

/// Per-call options for [`Store::get_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Surface `NotFound` and `MalformedBuffer` as errors (`true`) or as
    /// `Ok(None)` (`false`)
    pub strict: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl GetOptions {
    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Per-call options for [`Store::list_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    /// Rewrite the listing log before returning
    pub compact: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { compact: true }
    }
}

/// What `remove` did
///
/// `Ok(report)` always means the value file is gone; an incomplete prune is
/// reported here instead of failing the call. Failing to delete the value
/// file itself is an `Err`.
#[derive(Debug)]
pub struct RemoveReport {
    /// A value file existed and was deleted
    pub existed: bool,

    /// Empty directories deleted by the pruning walk
    pub pruned_dirs: usize,

    /// Error that stopped the pruning walk early
    pub prune_error: Option<io::Error>,
}

impl RemoveReport {
    /// Whether pruning ran to completion
    pub fn is_complete(&self) -> bool {
        self.prune_error.is_none()
    }
}

/// The main store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (set/remove/compact): Serialized by `write_lock`
///   - Only ONE mutation of the trie or the log at a time
///   - Lock order: write_lock → log (write)
///
/// - **Reads** (get/has): No lock
///   - Value files are replaced by rename, so readers see old or new bytes
///
/// - **Listing**: Read lock on the log's in-memory key set, or the write
///   path when compaction is requested
pub struct Store {
    /// Store configuration
    config: Config,

    /// Listing log and its materialized key set
    log: RwLock<ListingLog>,

    /// Serializes mutating operations
    write_lock: Mutex<()>,
}

impl Store {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const LIST_FILENAME: &'static str = "list";
    const VALUE_TMP_FILENAME: &'static str = "value.fts.tmp";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the root directory if it doesn't exist
    /// 2. Replay the listing log
    /// 3. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.root_dir)?;

        let log_path = config.root_dir.join(Self::LIST_FILENAME);
        let (log, stats) = ListingLog::open(&log_path, config.log_sync)?;

        tracing::info!(
            "Opened store at {}: {} keys ({} adds, {} removes, {} skipped lines)",
            config.root_dir.display(),
            stats.live_keys,
            stats.adds,
            stats.removes,
            stats.skipped
        );

        Ok(Self {
            config,
            log: RwLock::new(log),
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().root_dir(path).build())
    }

    /// Check a key's length bound (1..=36 characters)
    pub fn is_valid_key(key: &str) -> bool {
        key::is_valid_key(key)
    }

    /// Whether a value file exists for the key
    pub fn has(&self, key: &str) -> Result<bool> {
        key::validate_key(key)?;

        match fs::symlink_metadata(self.value_path(key)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Store a value, overwriting any previous one
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Create the directory chain
    /// 3. Write the encoded value (temp file + rename)
    /// 4. Append an add-marker to the listing log
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        key::validate_key(key)?;
        let value = value.into();
        let _write_guard = self.write_lock.lock();

        let key_dir = key::path_for(self.root(), key);
        trie::ensure_branch(&key_dir)?;
        self.write_value_file(&key_dir, &codec::encode(&value))?;

        let mut log = self.log.write();
        log.append(Marker::Add, key)?;
        tracing::debug!("set {:?} ({})", key, value.tag());

        self.maybe_compact(&mut log)
    }

    /// Get a value, failing with `NotFound` or `MalformedBuffer`
    pub fn get(&self, key: &str) -> Result<Value> {
        self.get_with(key, GetOptions::default())?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Get a value with explicit strictness
    ///
    /// Returns:
    /// - `Ok(Some(value))`: decoded value
    /// - `Ok(None)`: missing or malformed, only when `options.strict` is false
    /// - `Err(InvalidKey | Io)`: always surfaced
    pub fn get_with(&self, key: &str, options: GetOptions) -> Result<Option<Value>> {
        key::validate_key(key)?;

        let bytes = match fs::read(self.value_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return if options.strict {
                    Err(StoreError::NotFound(key.to_string()))
                } else {
                    Ok(None)
                };
            }
            Err(e) => return Err(e.into()),
        };

        codec::decode_with(&bytes, options.strict)
    }

    /// Remove a key and prune its dead branch
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Delete the value file (already absent is fine)
    /// 3. Append a remove-marker to the listing log
    /// 4. Delete empty directories from the key directory toward the root
    pub fn remove(&self, key: &str) -> Result<RemoveReport> {
        key::validate_key(key)?;
        let _write_guard = self.write_lock.lock();

        let key_dir = key::path_for(self.root(), key);
        let existed = match fs::remove_file(key_dir.join(key::VALUE_FILE_NAME)) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut log = self.log.write();
        log.append(Marker::Remove, key)?;

        let outcome = trie::prune_branch(self.root(), &key_dir);
        if let Some(e) = &outcome.error {
            tracing::warn!(
                "Removed {:?} but pruning stopped after {} directories: {}",
                key,
                outcome.pruned,
                e
            );
        }
        tracing::debug!("remove {:?} (existed: {}, pruned: {})", key, existed, outcome.pruned);

        self.maybe_compact(&mut log)?;

        Ok(RemoveReport {
            existed,
            pruned_dirs: outcome.pruned,
            prune_error: outcome.error,
        })
    }

    /// List present keys, compacting the log if the config says so
    pub fn list(&self) -> Result<BTreeSet<String>> {
        self.list_with(ListOptions {
            compact: self.config.compact_on_list,
        })
    }

    /// List present keys with explicit options
    pub fn list_with(&self, options: ListOptions) -> Result<BTreeSet<String>> {
        if options.compact {
            let _write_guard = self.write_lock.lock();
            let mut log = self.log.write();
            log.compact()?;
            return Ok(log.keys().clone());
        }

        Ok(self.log.read().keys().clone())
    }

    /// Compact the listing log now; returns the number of lines dropped
    pub fn compact(&self) -> Result<usize> {
        let _write_guard = self.write_lock.lock();
        let dropped = self.log.write().compact()?;
        tracing::info!("Compacted listing log: {} lines dropped", dropped);
        Ok(dropped)
    }

    /// Close the store, syncing the listing log
    pub fn close(self) -> Result<()> {
        let mut log = self.log.into_inner();
        log.sync()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of present keys
    pub fn len(&self) -> usize {
        self.log.read().keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the store root directory
    pub fn root(&self) -> &Path {
        &self.config.root_dir
    }

    /// Path of the listing log file
    pub fn log_path(&self) -> PathBuf {
        self.log.read().path().to_path_buf()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn value_path(&self, key: &str) -> PathBuf {
        key::value_path(self.root(), key)
    }

    /// Replace `value.fts` in `key_dir` with `bytes`
    ///
    /// On failure the temp file is deleted again, since a leftover one would
    /// keep the branch from ever being pruned.
    fn write_value_file(&self, key_dir: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_path = key_dir.join(Self::VALUE_TMP_FILENAME);
        let written = self
            .write_tmp_file(&tmp_path, bytes)
            .and_then(|()| fs::rename(&tmp_path, key_dir.join(key::VALUE_FILE_NAME)));

        if let Err(e) = written {
            match fs::remove_file(&tmp_path) {
                Ok(()) => {}
                Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
                Err(cleanup) => tracing::warn!(
                    "Failed to delete temp value file {}: {}",
                    tmp_path.display(),
                    cleanup
                ),
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn write_tmp_file(&self, tmp_path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(tmp_path)?;
        file.write_all(bytes)?;
        if self.config.log_sync == LogSyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Compact once enough superseded lines pile up (called with write lock held)
    fn maybe_compact(&self, log: &mut ListingLog) -> Result<()> {
        match self.config.compact_threshold {
            Some(threshold) if log.superseded_lines() >= threshold => {
                let dropped = log.compact()?;
                tracing::info!("Auto-compacted listing log: {} lines dropped", dropped);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
