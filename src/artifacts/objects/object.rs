use anyhow::Result;
use bytes::Bytes;
use std::io::{BufRead, Read};

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Inflate a zlib-compressed loose object
///
/// Returns the full payload, framing header included.
pub fn inflate(data: impl Read) -> std::io::Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload)?;

    Ok(payload.into())
}

/// Strip the `"<type> <size>\0"` framing header from an inflated payload
///
/// A payload without a NUL byte is returned unchanged.
pub fn strip_header(payload: &Bytes) -> Bytes {
    match payload.iter().position(|&b| b == 0) {
        Some(nul) => payload.slice(nul + 1..),
        None => payload.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn strip_header_keeps_content_after_first_nul() {
        let payload = Bytes::from_static(b"blob 11\0hello world");

        assert_eq!(strip_header(&payload), Bytes::from_static(b"hello world"));
    }

    #[test]
    fn strip_header_only_consumes_the_first_nul() {
        let payload = Bytes::from_static(b"blob 5\0a\0b\0c");

        assert_eq!(strip_header(&payload), Bytes::from_static(b"a\0b\0c"));
    }

    #[test]
    fn strip_header_without_nul_returns_payload_verbatim() {
        let payload = Bytes::from_static(b"no framing here");

        assert_eq!(strip_header(&payload), payload);
    }

    #[test]
    fn inflate_restores_compressed_payload() {
        let compressed = deflate(b"blob 3\0abc");

        let payload = inflate(compressed.as_slice()).unwrap();

        assert_eq!(payload, Bytes::from_static(b"blob 3\0abc"));
    }

    #[test]
    fn inflate_rejects_data_that_is_not_zlib() {
        let result = inflate(&b"<html>404 not found</html>"[..]);

        assert!(result.is_err());
    }
}
