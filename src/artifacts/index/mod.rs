//! Git index file format
//!
//! The index (also called staging area or cache) lists every tracked path of
//! the current checkout together with the hash of its blob.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 62-byte fixed prefix (stat data, SHA-1 at 40..60, flags at 60..62)
//!   - NUL-padded name, each entry padded to 8-byte alignment
//! ```
//!
//! Extensions and the trailing checksum are never read.

pub mod index_entry;
pub mod index_header;

/// Magic signature identifying index files
pub const SIGNATURE: [u8; 4] = *b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;

/// Size of the fixed part of an entry, up to and including the flags
pub const ENTRY_PREFIX_SIZE: usize = 62;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;
