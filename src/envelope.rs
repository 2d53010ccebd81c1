//! The 12-byte skippable-frame envelope written before every compressed
//! payload.
//!
//! Layout, all fields little-endian:
//!
//! | Offset | Size | Field          | Value                               |
//! |--------|------|----------------|-------------------------------------|
//! | 0      | 4    | magic          | codec's skippable-frame magic       |
//! | 4      | 4    | field length   | always [`SIZE_FIELD_BYTES`] (= 4)   |
//! | 8      | 4    | payload length | compressed bytes that follow        |
//!
//! The magic values are chosen from the codecs' skippable-frame ranges, so a
//! stock single-threaded decoder of the underlying format walks over the
//! envelope without noticing it and decodes the payload frames directly.

use crate::error::{Error, Result};

/// Envelope size in bytes.
pub const ENVELOPE_SIZE: usize = 12;

/// Value of the skippable frame's own length field: the four payload-length
/// bytes at offset 8 are the entire skippable-frame content.
pub const SIZE_FIELD_BYTES: u32 = 4;

/// Read a little-endian `u32` from `src` at byte `offset`.
#[inline]
pub fn read_le32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
    ])
}

/// Write a little-endian `u32` into `dst` at byte `offset`.
#[inline]
pub fn write_le32(dst: &mut [u8], offset: usize, value: u32) {
    dst[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Fill the first [`ENVELOPE_SIZE`] bytes of `dst` with an envelope declaring
/// `payload_len` compressed bytes.
pub fn write_header(dst: &mut [u8], magic: u32, payload_len: u32) {
    write_le32(dst, 0, magic);
    write_le32(dst, 4, SIZE_FIELD_BYTES);
    write_le32(dst, 8, payload_len);
}

/// Parse an envelope and return the declared payload length.
///
/// `src` must hold at least [`ENVELOPE_SIZE`] bytes.  Rejects a wrong magic
/// or a length field other than [`SIZE_FIELD_BYTES`] with
/// [`Error::DataError`].
pub fn parse_header(src: &[u8], magic: u32) -> Result<usize> {
    debug_assert!(src.len() >= ENVELOPE_SIZE);
    let found = read_le32(src, 0);
    if found != magic {
        return Err(Error::DataError(format!(
            "bad envelope magic {found:#010x}, expected {magic:#010x}"
        )));
    }
    let field = read_le32(src, 4);
    if field != SIZE_FIELD_BYTES {
        return Err(Error::DataError(format!(
            "bad envelope size field {field}, expected {SIZE_FIELD_BYTES}"
        )));
    }
    Ok(read_le32(src, 8) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAGIC: u32 = 0x184D_2A50;

    #[test]
    fn round_trip() {
        let mut hdr = [0u8; ENVELOPE_SIZE];
        write_header(&mut hdr, MAGIC, 12345);
        assert_eq!(parse_header(&hdr, MAGIC).unwrap(), 12345);
    }

    #[test]
    fn layout_is_little_endian() {
        let mut hdr = [0u8; ENVELOPE_SIZE];
        write_header(&mut hdr, MAGIC, 0x0102_0304);
        assert_eq!(&hdr[0..4], &[0x50, 0x2A, 0x4D, 0x18]);
        assert_eq!(&hdr[4..8], &[4, 0, 0, 0]);
        assert_eq!(&hdr[8..12], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut hdr = [0u8; ENVELOPE_SIZE];
        write_header(&mut hdr, MAGIC, 7);
        let err = parse_header(&hdr, MAGIC + 1).unwrap_err();
        assert_eq!(err.error_name(), "data_error");
    }

    #[test]
    fn wrong_size_field_is_rejected() {
        let mut hdr = [0u8; ENVELOPE_SIZE];
        write_header(&mut hdr, MAGIC, 7);
        write_le32(&mut hdr, 4, 8);
        assert!(parse_header(&hdr, MAGIC).is_err());
    }
}
