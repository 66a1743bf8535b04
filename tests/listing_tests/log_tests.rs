//! Tests for the Listing Log
//!
//! These tests verify:
//! - Line format of appended entries
//! - Replay ordering (last line for a key wins)
//! - Blank lines, malformed lines and a final line without newline
//! - Compaction rewrites the file to the present set

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use treestore::config::LogSyncStrategy;
use treestore::listing::{ListingEntry, ListingLog, ListingReader, ListingReplay, Marker};
use treestore::StoreError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("list");
    (temp_dir, log_path)
}

fn set_of(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

// =============================================================================
// Entry Tests
// =============================================================================

#[test]
fn test_entry_line_format() {
    assert_eq!(ListingEntry::add("abc").to_line(), b">abc\n");
    assert_eq!(ListingEntry::remove("abc").to_line(), b"<abc\n");
}

#[test]
fn test_entry_line_encodes_newlines() {
    assert_eq!(ListingEntry::add("a\nb").to_line(), b">a%0Ab\n");
    let parsed = ListingEntry::parse(b">a%0Ab", 1).unwrap();
    assert_eq!(parsed.key, "a\nb");
}

#[test]
fn test_entry_line_escapes_uri_safe_punctuation() {
    assert_eq!(ListingEntry::add("a-b_c~d").to_line(), b">a-b_c~d\n");
    assert_eq!(ListingEntry::add("a.b").to_line(), b">a%2Eb\n");
    assert_eq!(ListingEntry::remove("!*'()").to_line(), b"<%21%2A%27%28%29\n");

    let parsed = ListingEntry::parse(b">%21%2A%27%28%29", 1).unwrap();
    assert_eq!(parsed.key, "!*'()");
}

#[test]
fn test_entry_parse_rejects_unknown_marker() {
    let err = ListingEntry::parse(b"?abc", 3).unwrap_err();
    match err {
        StoreError::LogCorruption { line, .. } => assert_eq!(line, 3),
        other => panic!("Expected LogCorruption, got {:?}", other),
    }
}

#[test]
fn test_entry_parse_rejects_empty_key() {
    assert!(ListingEntry::parse(b">", 1).is_err());
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_missing_file_is_empty() {
    let (_temp, log_path) = setup_temp_log();
    let (keys, stats) = ListingReplay::replay(&log_path).unwrap();
    assert!(keys.is_empty());
    assert_eq!(stats.lines, 0);
}

#[test]
fn test_replay_last_line_wins() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">k1\n>k2\n<k1\n>k1\n>k3\n<k3\n").unwrap();

    let (keys, stats) = ListingReplay::replay(&log_path).unwrap();

    assert_eq!(keys, set_of(&["k1", "k2"]));
    assert_eq!(stats.adds, 4);
    assert_eq!(stats.removes, 2);
    assert_eq!(stats.live_keys, 2);
}

#[test]
fn test_replay_remove_before_add_is_harmless() {
    let entries = vec![ListingEntry::remove("x"), ListingEntry::add("x")];
    assert_eq!(ListingReplay::replay_entries(entries), set_of(&["x"]));
}

#[test]
fn test_replay_ignores_blank_lines() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">a\n\n>b\n\n").unwrap();

    let (keys, stats) = ListingReplay::replay(&log_path).unwrap();

    assert_eq!(keys, set_of(&["a", "b"]));
    assert_eq!(stats.skipped, 0);
}

#[test]
fn test_replay_skips_malformed_lines() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">a\ngarbage\n>b\n").unwrap();

    let (keys, stats) = ListingReplay::replay(&log_path).unwrap();

    assert_eq!(keys, set_of(&["a", "b"]));
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_reader_parses_unterminated_final_line() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">a\n>b").unwrap();

    let mut reader = ListingReader::open(&log_path).unwrap();
    let entries: Vec<_> = reader.by_ref().collect::<Result<_, _>>().unwrap();

    assert_eq!(entries, vec![ListingEntry::add("a"), ListingEntry::add("b")]);
    assert!(reader.unterminated_tail());
    assert_eq!(reader.bytes_read(), 5);
}

#[test]
fn test_replay_unterminated_final_line() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">a\n>b").unwrap();

    let (keys, stats) = ListingReplay::replay(&log_path).unwrap();

    assert_eq!(keys, set_of(&["a", "b"]));
    assert!(stats.unterminated_tail);
}

#[test]
fn test_replay_unterminated_final_remove() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">a\n>b\n<a").unwrap();

    let (keys, _) = ListingReplay::replay(&log_path).unwrap();

    assert_eq!(keys, set_of(&["b"]));
}

// =============================================================================
// ListingLog Tests
// =============================================================================

#[test]
fn test_log_append_writes_lines() {
    let (_temp, log_path) = setup_temp_log();
    let (mut log, _) = ListingLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    log.append(Marker::Add, "k1").unwrap();
    log.append(Marker::Add, "k2").unwrap();
    log.append(Marker::Remove, "k1").unwrap();

    assert_eq!(fs::read_to_string(&log_path).unwrap(), ">k1\n>k2\n<k1\n");
    assert_eq!(log.keys(), &set_of(&["k2"]));
    assert_eq!(log.replay().unwrap(), set_of(&["k2"]));
    assert_eq!(log.superseded_lines(), 2);
}

#[test]
fn test_log_reopen_rebuilds_keys() {
    let (_temp, log_path) = setup_temp_log();
    {
        let (mut log, _) = ListingLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();
        log.append(Marker::Add, "alpha").unwrap();
        log.append(Marker::Add, "beta").unwrap();
        log.append(Marker::Remove, "alpha").unwrap();
    }

    let (log, stats) = ListingLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    assert_eq!(log.keys(), &set_of(&["beta"]));
    assert_eq!(stats.adds, 2);
    assert_eq!(stats.removes, 1);
    assert_eq!(log.line_count(), 3);
}

#[test]
fn test_log_open_keeps_unterminated_final_line() {
    let (_temp, log_path) = setup_temp_log();
    fs::write(&log_path, ">a\n>b").unwrap();

    let (mut log, stats) = ListingLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();
    assert!(stats.unterminated_tail);
    assert_eq!(log.keys(), &set_of(&["a", "b"]));
    assert_eq!(fs::read_to_string(&log_path).unwrap(), ">a\n>b");

    log.append(Marker::Add, "c").unwrap();
    log.append(Marker::Remove, "a").unwrap();

    assert_eq!(fs::read_to_string(&log_path).unwrap(), ">a\n>b\n>c\n<a\n");
    assert_eq!(log.replay().unwrap(), set_of(&["b", "c"]));
    assert_eq!(log.line_count(), 4);
}

#[test]
fn test_log_compact_keeps_only_present_adds() {
    let (_temp, log_path) = setup_temp_log();
    let (mut log, _) = ListingLog::open(&log_path, LogSyncStrategy::OsBuffered).unwrap();

    log.append(Marker::Add, "k1").unwrap();
    log.append(Marker::Add, "k2").unwrap();
    log.append(Marker::Remove, "k1").unwrap();
    log.append(Marker::Add, "k1").unwrap();
    log.append(Marker::Add, "k1").unwrap();

    let dropped = log.compact().unwrap();

    assert_eq!(dropped, 3);
    assert_eq!(fs::read_to_string(&log_path).unwrap(), ">k1\n>k2\n");
    assert_eq!(log.keys(), &set_of(&["k1", "k2"]));
    assert_eq!(log.superseded_lines(), 0);
    assert!(!log_path.with_extension("tmp").exists());
}

#[test]
fn test_log_append_after_compact() {
    let (_temp, log_path) = setup_temp_log();
    let (mut log, _) = ListingLog::open(&log_path, LogSyncStrategy::EveryWrite).unwrap();

    log.append(Marker::Add, "a").unwrap();
    log.append(Marker::Remove, "a").unwrap();
    log.compact().unwrap();
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "");

    log.append(Marker::Add, "b").unwrap();

    assert_eq!(fs::read_to_string(&log_path).unwrap(), ">b\n");
    assert_eq!(log.replay().unwrap(), set_of(&["b"]));
}
