//! Listing Log Replay
//!
//! Rebuilds the present key set from the journal.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use crate::error::{Result, StoreError};

use super::{ListingEntry, ListingReader, Marker};

/// Rebuilds key sets from listing log entries
pub struct ListingReplay;

/// Result of a replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    /// Add lines applied
    pub adds: u64,

    /// Remove lines applied
    pub removes: u64,

    /// Malformed lines skipped
    pub skipped: u64,

    /// Lines in the file, blank ones included
    pub lines: usize,

    /// Keys present after replay
    pub live_keys: usize,

    /// Bytes in the file
    pub bytes: u64,

    /// Whether the last line had no terminating newline
    pub unterminated_tail: bool,
}

impl ListingReplay {
    /// Apply one entry: `>` inserts, `<` removes; the later line wins
    pub fn apply(keys: &mut BTreeSet<String>, entry: ListingEntry) {
        match entry.marker {
            Marker::Add => {
                keys.insert(entry.key);
            }
            Marker::Remove => {
                keys.remove(&entry.key);
            }
        }
    }

    /// Replay entries in order
    pub fn replay_entries<I>(entries: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = ListingEntry>,
    {
        let mut keys = BTreeSet::new();
        for entry in entries {
            Self::apply(&mut keys, entry);
        }
        keys
    }

    /// Replay a listing log file
    ///
    /// A missing file is an empty log. Malformed lines are skipped and
    /// counted; I/O errors abort the replay.
    pub fn replay(path: &Path) -> Result<(BTreeSet<String>, ReplayStats)> {
        let mut reader = match ListingReader::open(path) {
            Ok(reader) => reader,
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Ok((BTreeSet::new(), ReplayStats::default()));
            }
            Err(e) => return Err(e),
        };

        let mut keys = BTreeSet::new();
        let mut stats = ReplayStats::default();

        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => {
                    match entry.marker {
                        Marker::Add => stats.adds += 1,
                        Marker::Remove => stats.removes += 1,
                    }
                    Self::apply(&mut keys, entry);
                }
                Ok(None) => break,
                Err(StoreError::LogCorruption { line, reason }) => {
                    tracing::warn!("Skipping listing log line {}: {}", line, reason);
                    stats.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        stats.lines = reader.lines_read();
        stats.live_keys = keys.len();
        stats.bytes = reader.bytes_read();
        stats.unterminated_tail = reader.unterminated_tail();

        Ok((keys, stats))
    }
}
