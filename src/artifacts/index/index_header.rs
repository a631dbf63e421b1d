use crate::artifacts::errors::IndexError;
use crate::artifacts::index::{SIGNATURE, VERSION};
use byteorder::ReadBytesExt;
use derive_new::new;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub marker: [u8; 4],
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    /// Read and validate the 12-byte header
    ///
    /// The signature is checked before the version is even read, so any stream
    /// that does not start with `DIRC` is rejected as such.
    pub fn read_from(reader: &mut impl Read) -> Result<Self, IndexError> {
        let mut marker = [0; 4];
        reader
            .read_exact(&mut marker)
            .map_err(IndexError::TruncatedHeader)?;

        if marker != SIGNATURE {
            return Err(IndexError::InvalidSignature(marker));
        }

        let version = reader
            .read_u32::<byteorder::NetworkEndian>()
            .map_err(IndexError::TruncatedHeader)?;

        if version != VERSION {
            return Err(IndexError::UnsupportedVersion(version));
        }

        let entries_count = reader
            .read_u32::<byteorder::NetworkEndian>()
            .map_err(IndexError::TruncatedHeader)?;

        Ok(IndexHeader::new(marker, version, entries_count))
    }
}
