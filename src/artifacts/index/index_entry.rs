//! Index entry representation
//!
//! Recovery only needs two things from each entry: the blob it points to and
//! the path it should be written to. Stat data, modes and owner ids are skipped.
//!
//! ## Entry Format
//!
//! ```text
//! offset  0..40  ctime, mtime, dev, ino, mode, uid, gid, size
//! offset 40..60  SHA-1 of the blob
//! offset 60..62  flags; the low byte (offset 61) holds the name length
//! offset 62..    name, NUL-padded so the entry ends on an 8-byte boundary
//! ```
//!
//! Only the low byte of the flags is read. Names longer than 255 bytes carry
//! more length bits at offset 60, which this reader does not use.

use crate::artifacts::index::{ENTRY_BLOCK, ENTRY_PREFIX_SIZE};
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::io::Read;

/// Offset of the blob hash inside the fixed prefix
const OID_OFFSET: usize = 40;

/// Offset of the name length byte inside the fixed prefix
const NAME_LENGTH_OFFSET: usize = 61;

/// One tracked file as declared by the index
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Path relative to the repository root, as found in the index
    pub name: String,
    /// SHA-1 hash of the file content
    pub oid: ObjectId,
    /// Low byte of the entry flags
    pub name_length: u8,
}

impl IndexEntry {
    /// Read one entry: the fixed prefix followed by its padded name field
    ///
    /// Any I/O error, including `UnexpectedEof` on a truncated stream, is
    /// returned untouched so the caller can tell truncation apart.
    pub fn read_from(reader: &mut impl Read) -> std::io::Result<Self> {
        let mut prefix = [0; ENTRY_PREFIX_SIZE];
        reader.read_exact(&mut prefix)?;

        let oid = ObjectId::read_h40_from(&mut &prefix[OID_OFFSET..OID_OFFSET + 20])?;
        let name_length = prefix[NAME_LENGTH_OFFSET];

        let mut name = vec![0; name_field_len(name_length)];
        reader.read_exact(&mut name)?;

        let name_end = name.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let name = String::from_utf8_lossy(&name[..name_end]).into_owned();

        Ok(IndexEntry::new(name, oid, name_length))
    }
}

/// On-disk size of the name field for a declared name length
///
/// The smallest size that makes `62 + size` a multiple of 8 while being
/// strictly larger than `62 + name_length`; the name is therefore followed by
/// one to eight NUL bytes.
pub fn name_field_len(name_length: u8) -> usize {
    let unpadded = ENTRY_PREFIX_SIZE + name_length as usize;
    let padded = (unpadded / ENTRY_BLOCK + 1) * ENTRY_BLOCK;

    padded - ENTRY_PREFIX_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn raw_entry(name: &str, fill: u8) -> Vec<u8> {
        let mut bytes = vec![0xee; OID_OFFSET];
        bytes.extend([fill; 20]);
        bytes.push(0);
        bytes.push(name.len() as u8);
        bytes.extend(name.as_bytes());
        bytes.resize(ENTRY_PREFIX_SIZE + name_field_len(name.len() as u8), 0);
        bytes
    }

    #[rstest]
    #[case(0, 2)]
    #[case(1, 2)]
    #[case(2, 10)]
    #[case(7, 10)]
    #[case(8, 10)]
    #[case(9, 10)]
    #[case(10, 18)]
    #[case(255, 258)]
    fn name_field_is_padded_to_the_next_block(#[case] name_length: u8, #[case] expected: usize) {
        assert_eq!(name_field_len(name_length), expected);
    }

    proptest! {
        #[test]
        fn name_field_always_ends_entry_on_block_boundary(name_length in any::<u8>()) {
            let field = name_field_len(name_length);
            let declared = ENTRY_PREFIX_SIZE + name_length as usize;

            prop_assert_eq!((ENTRY_PREFIX_SIZE + field) % ENTRY_BLOCK, 0);
            prop_assert!(ENTRY_PREFIX_SIZE + field > declared);
            prop_assert!(ENTRY_PREFIX_SIZE + field <= declared + ENTRY_BLOCK);
        }
    }

    #[test]
    fn entry_reads_hash_length_and_name() {
        let bytes = raw_entry("src/lib.rs", 0xab);
        let mut reader = bytes.as_slice();

        let entry = IndexEntry::read_from(&mut reader).unwrap();

        assert_eq!(entry.name, "src/lib.rs");
        assert_eq!(entry.name_length, 10);
        assert_eq!(entry.oid.as_ref(), "ab".repeat(20));
        assert!(reader.is_empty());
    }

    #[test]
    fn consecutive_entries_stay_aligned() {
        let bytes = [raw_entry("a", 0x01), raw_entry("abcdefgh", 0x02)].concat();
        let mut reader = bytes.as_slice();

        let first = IndexEntry::read_from(&mut reader).unwrap();
        let second = IndexEntry::read_from(&mut reader).unwrap();

        assert_eq!(first.name, "a");
        assert_eq!(second.name, "abcdefgh");
        assert_eq!(second.oid.as_ref(), "02".repeat(20));
    }

    #[test]
    fn truncated_name_field_is_unexpected_eof() {
        let mut bytes = raw_entry("README.md", 0x03);
        bytes.truncate(ENTRY_PREFIX_SIZE + 3);

        let err = IndexEntry::read_from(&mut bytes.as_slice()).unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
