//! Listing Log Module
//!
//! Append-only journal of key additions and removals.
//!
//! ## Responsibilities
//! - Append one marker line per `set`/`remove`
//! - Replay lines in file order to rebuild the present key set
//! - Compact the journal down to one add-line per present key
//! - Terminate an unterminated final line before appending after it
//!
//! ## File Format
//! ```text
//! >alpha\n      add "alpha"
//! >beta\n       add "beta"
//! <alpha\n      remove "alpha"
//! >alpha\n      add "alpha" again (last line for a key wins)
//! ```
//!
//! ## Encoded Keys
//! A line holds the marker followed by the percent-encoded key (the same
//! form used for the directory names), not the raw key. A key can therefore
//! never contain the line separator. Keys made only of ASCII alphanumerics,
//! `-`, `_` and `~` are written unchanged, so a log of such keys reads as
//! plain `<marker><key>` lines; anything else shows up escaped:
//!
//! ```text
//! >a%2Eb\n     add "a.b"
//! >a%0Ab\n     add "a\nb"
//! ```
//!
//! The escape set is stricter than JavaScript's URI-component encoding:
//! `.`, `!`, `*`, `'`, `(` and `)` are escaped as well. Tools reading the log
//! must percent-decode each key.

mod entry;
mod log;
mod reader;
mod replay;

pub use entry::{ListingEntry, Marker};
pub use log::ListingLog;
pub use reader::ListingReader;
pub use replay::{ListingReplay, ReplayStats};
