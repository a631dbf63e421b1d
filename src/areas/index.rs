//! Git index decoding
//!
//! Turns the raw bytes of a remote `.git/index` into the ordered list of
//! entries to recover. The stream is untrusted: a bad signature or version is
//! fatal, while a stream that stops early only shortens the list.

use crate::artifacts::errors::IndexError;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use std::io::{ErrorKind, Read};

/// Decoded Git index
#[derive(Debug)]
pub struct Index {
    header: IndexHeader,
    entries: Vec<IndexEntry>,
    /// The stream ended in the middle of an entry
    truncated: bool,
    /// Read error, other than end of stream, that cut decoding short
    read_error: Option<std::io::Error>,
}

impl Index {
    /// Decode an index stream
    ///
    /// Returns an error only for a header that fails validation. Entries are
    /// read until the declared count is reached or the stream gives out,
    /// whichever comes first.
    pub fn decode(mut reader: impl Read) -> Result<Self, IndexError> {
        let header = IndexHeader::read_from(&mut reader)?;

        // the declared count is untrusted, so it never sizes an allocation
        let mut entries = Vec::new();
        let mut truncated = false;
        let mut read_error = None;

        for _ in 0..header.entries_count {
            match IndexEntry::read_from(&mut reader) {
                Ok(entry) => entries.push(entry),
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                    truncated = true;
                    break;
                }
                Err(err) => {
                    read_error = Some(err);
                    break;
                }
            }
        }

        Ok(Index {
            header,
            entries,
            truncated,
            read_error,
        })
    }

    pub fn header(&self) -> &IndexHeader {
        &self.header
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn read_error(&self) -> Option<&std::io::Error> {
        self.read_error.as_ref()
    }

    /// Number of entries the header claims
    pub fn declared_count(&self) -> u32 {
        self.header.entries_count
    }

    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }
}
