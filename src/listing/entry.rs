//! Listing log entry definitions
//!
//! One line per entry: `<marker><encoded key>\n`.

use crate::error::{Result, StoreError};
use crate::key;

/// Add/remove marker at the start of each line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `>`: the key is present
    Add,

    /// `<`: the key is gone
    Remove,
}

impl Marker {
    pub fn as_byte(self) -> u8 {
        match self {
            Marker::Add => b'>',
            Marker::Remove => b'<',
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'>' => Some(Marker::Add),
            b'<' => Some(Marker::Remove),
            _ => None,
        }
    }
}

/// A single line of the listing log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub marker: Marker,
    pub key: String,
}

impl ListingEntry {
    pub fn new(marker: Marker, key: impl Into<String>) -> Self {
        Self {
            marker,
            key: key.into(),
        }
    }

    pub fn add(key: impl Into<String>) -> Self {
        Self::new(Marker::Add, key)
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::new(Marker::Remove, key)
    }

    /// Serialize to one newline-terminated line
    pub fn to_line(&self) -> Vec<u8> {
        let encoded = key::encode_key(&self.key);
        let mut line = Vec::with_capacity(encoded.len() + 2);
        line.push(self.marker.as_byte());
        line.extend_from_slice(encoded.as_bytes());
        line.push(b'\n');
        line
    }

    /// Parse a line with its terminator already stripped
    ///
    /// `line_no` is 1-based and only used for error reporting.
    pub fn parse(line: &[u8], line_no: usize) -> Result<Self> {
        let corrupt = |reason: &str| StoreError::LogCorruption {
            line: line_no,
            reason: reason.to_string(),
        };

        let (&first, rest) = line.split_first().ok_or_else(|| corrupt("empty line"))?;
        let marker = Marker::from_byte(first)
            .ok_or_else(|| corrupt(&format!("unknown marker 0x{:02x}", first)))?;

        let encoded = std::str::from_utf8(rest).map_err(|_| corrupt("key is not UTF-8"))?;
        let key = key::decode_key(encoded).ok_or_else(|| corrupt("key does not decode"))?;
        if !key::is_valid_key(&key) {
            return Err(corrupt(&format!("key {:?} has invalid length", key)));
        }

        Ok(Self { marker, key })
    }
}
