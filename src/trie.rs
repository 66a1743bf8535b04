//! Directory Trie
//!
//! Creation and dead-branch pruning of the per-character directory chain.
//!
//! ## Pruning
//! After a value file is removed, the chain from the key directory up to
//! (but never including) the store root is walked leaf-first. Each empty
//! directory is deleted; the walk stops at the first directory that still
//! holds anything (a sibling's subdirectory, another key's `value.fts`).
//!
//! ```text
//! root/a/b/value.fts        remove("abc") deletes root/a/b/c only
//! root/a/b/c/value.fts      remove("ab")  then deletes root/a/b and root/a
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of a pruning walk
#[derive(Debug, Default)]
pub struct PruneOutcome {
    /// Directories deleted
    pub pruned: usize,

    /// The error that stopped the walk early, if any
    pub error: Option<io::Error>,
}

/// Create every directory of a key's chain (idempotent)
pub fn ensure_branch(key_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(key_dir)
}

/// Directories from `key_dir` up to `root`, leaf first, `root` excluded
pub fn branch_dirs(root: &Path, key_dir: &Path) -> Vec<PathBuf> {
    key_dir
        .ancestors()
        .take_while(|dir| *dir != root)
        .map(Path::to_path_buf)
        .collect()
}

/// Delete the empty part of a key's chain, leaf first
pub fn prune_branch(root: &Path, key_dir: &Path) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();

    for dir in branch_dirs(root, key_dir) {
        match is_empty_dir(&dir) {
            Ok(true) => {}
            Ok(false) => break,
            // Already gone: keep walking, the parent may now be empty
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                outcome.error = Some(e);
                break;
            }
        }

        match fs::remove_dir(&dir) {
            Ok(()) => {
                tracing::trace!("Pruned {}", dir.display());
                outcome.pruned += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                // Something was created in between: the branch is live again
                if matches!(is_empty_dir(&dir), Ok(false)) {
                    break;
                }
                outcome.error = Some(e);
                break;
            }
        }
    }

    outcome
}

fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}
