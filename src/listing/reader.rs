//! Listing Log Reader
//!
//! Reads entries line by line, in file order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

use super::ListingEntry;

/// Sequential reader over a listing log file
///
/// Blank lines are skipped. A final line without a terminating newline is
/// still parsed as an entry; [`unterminated_tail`] reports that it was
/// missing its `\n`.
///
/// [`unterminated_tail`]: ListingReader::unterminated_tail
pub struct ListingReader {
    reader: BufReader<File>,
    /// Lines consumed so far (1-based number of the last line read)
    line_no: usize,
    bytes_read: u64,
    unterminated_tail: bool,
    buf: Vec<u8>,
}

impl ListingReader {
    /// Open a listing log for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            line_no: 0,
            bytes_read: 0,
            unterminated_tail: false,
            buf: Vec::new(),
        })
    }

    /// Read the next entry
    ///
    /// Returns:
    /// - `Ok(Some(entry))`: a well-formed line
    /// - `Ok(None)`: end of file
    /// - `Err(LogCorruption)`: a malformed line; reading may continue
    /// - `Err(Io)`: the file could not be read
    pub fn next_entry(&mut self) -> Result<Option<ListingEntry>> {
        loop {
            self.buf.clear();
            let n = self.reader.read_until(b'\n', &mut self.buf)?;
            if n == 0 {
                return Ok(None);
            }

            self.line_no += 1;
            self.bytes_read += n as u64;

            let line = match self.buf.strip_suffix(b"\n") {
                Some(line) => line,
                None => {
                    self.unterminated_tail = true;
                    &self.buf[..]
                }
            };
            if line.is_empty() {
                continue;
            }
            return ListingEntry::parse(line, self.line_no).map(Some);
        }
    }

    /// Number of lines read so far, blank ones included
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Bytes consumed so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the file's last line had no terminating newline
    pub fn unterminated_tail(&self) -> bool {
        self.unterminated_tail
    }
}

impl Iterator for ListingReader {
    type Item = Result<ListingEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
