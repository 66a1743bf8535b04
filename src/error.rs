//! Error types for TreeStore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for TreeStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key {key:?}: length {len} is outside 1..=36")]
    InvalidKey { key: String, len: usize },

    #[error("Key not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Malformed FTS buffer: {0}")]
    MalformedBuffer(String),

    // -------------------------------------------------------------------------
    // Listing Log Errors
    // -------------------------------------------------------------------------
    #[error("Listing log corruption at line {line}: {reason}")]
    LogCorruption { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for the missing-key outcome of `get`
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// True when a stored buffer failed FTS validation
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::MalformedBuffer(_))
    }
}
