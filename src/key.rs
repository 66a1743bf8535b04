//! Key Mapper
//!
//! Validates keys and maps them onto the directory trie.
//!
//! A key is percent-encoded first, then every character of the encoded form
//! becomes one path segment:
//!
//! ```text
//! key "a/b"  →  encoded "a%2Fb"  →  {root}/a/%/2/F/b/value.fts
//! ```

use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Result, StoreError};

/// Longest accepted key, in characters
pub const MAX_KEY_LENGTH: usize = 36;

/// Reserved leaf file holding a key's encoded value
pub const VALUE_FILE_NAME: &str = "value.fts";

/// Characters left as-is: ASCII alphanumerics plus `-`, `_` and `~`.
/// `.` is encoded so that no segment can ever be `.` on its own; `!`, `*`,
/// `'`, `(` and `)` are encoded too, unlike URI-component encoding.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Check the key length bound (1..=36 characters)
///
/// The character set is not restricted; percent-encoding makes any key
/// filesystem-safe.
pub fn is_valid_key(key: &str) -> bool {
    let len = key.chars().count();
    (1..=MAX_KEY_LENGTH).contains(&len)
}

/// Like [`is_valid_key`], but as an `InvalidKey` error
pub fn validate_key(key: &str) -> Result<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey {
            key: key.to_string(),
            len: key.chars().count(),
        })
    }
}

/// Percent-encoded form of a key, as used on disk
pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_ENCODE_SET).to_string()
}

/// Reverse of [`encode_key`]; `None` if the result is not UTF-8
pub fn decode_key(encoded: &str) -> Option<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Directory for a key: one segment per encoded character
pub fn path_for(root: &Path, key: &str) -> PathBuf {
    let encoded = encode_key(key);
    let mut path = root.to_path_buf();
    for (i, c) in encoded.char_indices() {
        path.push(&encoded[i..i + c.len_utf8()]);
    }
    path
}

/// Full path of a key's value file
pub fn value_path(root: &Path, key: &str) -> PathBuf {
    path_for(root, key).join(VALUE_FILE_NAME)
}
