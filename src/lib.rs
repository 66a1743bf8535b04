//! # TreeStore
//!
//! A key/value store that keeps every value as a file in a directory trie:
//! - One directory per character of the percent-encoded key
//! - A tagged binary value format ("FTS")
//! - An append-only listing log replayed to know the present keys
//! - Dead-branch pruning when keys are removed
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                               │
//! │            (Single Writer / Multi Reader)                    │
//! └──────┬──────────────────┬───────────────────┬───────────────┘
//!        │                  │                   │
//!        ▼                  ▼                   ▼
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │ Key Mapper  │   │ Value Codec  │   │  Listing Log    │
//! │ (key → dir) │   │ (FTS bytes)  │   │ (>key / <key)   │
//! └──────┬──────┘   └──────────────┘   └─────────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │     Trie     │
//! │ (mkdir/prune)│
//! └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use treestore::{Store, Value};
//!
//! let store = Store::open_path(std::path::Path::new("./data"))?;
//! store.set("greeting", "hello")?;
//! assert_eq!(store.get("greeting")?, Value::from("hello"));
//! # Ok::<(), treestore::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod key;
pub mod listing;
pub mod trie;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, LogSyncStrategy};
pub use codec::{TypedArray, Value};
pub use store::{GetOptions, ListOptions, RemoveReport, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TreeStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
