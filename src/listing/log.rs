//! Listing Log
//!
//! Append handle plus the in-memory key set materialized from it.

use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::LogSyncStrategy;
use crate::error::Result;

use super::{ListingEntry, ListingReplay, Marker, ReplayStats};

/// The append-only listing log of a store
///
/// ## Invariants
/// - `keys` always equals the replay of the file contents
/// - `lines` counts the non-blank lines currently in the file
pub struct ListingLog {
    path: PathBuf,
    file: File,
    sync: LogSyncStrategy,
    keys: BTreeSet<String>,
    lines: usize,
    /// The file's last line has no `\n` yet
    needs_newline: bool,
}

impl ListingLog {
    /// Open or create a listing log and replay it
    ///
    /// An unterminated final line counts as an entry; the next append
    /// terminates it before writing its own line.
    pub fn open(path: &Path, sync: LogSyncStrategy) -> Result<(Self, ReplayStats)> {
        let (keys, stats) = ListingReplay::replay(path)?;

        if stats.unterminated_tail {
            tracing::debug!("Listing log {} ends without a newline", path.display());
        }

        let file = Self::open_append(path)?;
        let log = Self {
            path: path.to_path_buf(),
            file,
            sync,
            keys,
            lines: (stats.adds + stats.removes + stats.skipped) as usize,
            needs_newline: stats.unterminated_tail,
        };

        Ok((log, stats))
    }

    /// Append one marker line and update the key set
    pub fn append(&mut self, marker: Marker, key: &str) -> Result<()> {
        let entry = ListingEntry::new(marker, key);
        let mut line = Vec::new();
        if self.needs_newline {
            line.push(b'\n');
        }
        line.extend_from_slice(&entry.to_line());
        self.file.write_all(&line)?;
        self.needs_newline = false;
        if self.sync == LogSyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }

        self.lines += 1;
        ListingReplay::apply(&mut self.keys, entry);
        Ok(())
    }

    /// Re-read the file and return the key set it describes
    pub fn replay(&self) -> Result<BTreeSet<String>> {
        Ok(ListingReplay::replay(&self.path)?.0)
    }

    /// Rewrite the log as one add-line per present key
    ///
    /// Writes `<log>.tmp`, syncs it, then renames it over the log, so a crash
    /// leaves either the old or the new file. Returns the number of lines
    /// dropped.
    pub fn compact(&mut self) -> Result<usize> {
        let (keys, _) = ListingReplay::replay(&self.path)?;

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            for key in &keys {
                tmp.write_all(&ListingEntry::add(key.as_str()).to_line())?;
            }
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        self.file = Self::open_append(&self.path)?;
        self.needs_newline = false;

        let dropped = self.lines.saturating_sub(keys.len());
        self.lines = keys.len();
        self.keys = keys;

        tracing::debug!(
            "Compacted listing log {}: {} lines dropped, {} keys kept",
            self.path.display(),
            dropped,
            self.lines
        );
        Ok(dropped)
    }

    /// Present keys, in sorted order
    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Lines that compaction would drop
    pub fn superseded_lines(&self) -> usize {
        self.lines.saturating_sub(self.keys.len())
    }

    /// Non-blank lines currently in the file
    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn open_append(path: &Path) -> Result<File> {
        Ok(OpenOptions::new().create(true).append(true).open(path)?)
    }
}
