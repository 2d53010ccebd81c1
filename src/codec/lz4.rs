//! LZ4 backend over the `lz4_flex` frame API.
//!
//! `lz4_flex` exposes a single (fast) parser, so the compression level only
//! selects the default chunk size here; the encoded bytes are the same at
//! every level.  Frames use the library's defaults (64 KiB independent
//! blocks), and since the engine wraps each chunk in its own complete LZ4
//! frame, nothing about the frame internals leaks into the stream contract.

use std::io::{Read, Write};

use crate::codec::{FrameCodec, FrameDecoder, FrameEncoder};
use crate::error::{Error, Result};

/// Maximum LZ4 frame header: magic, descriptor, content size, dictionary id.
const MAX_FRAME_HEADER: usize = 19;

/// End mark plus optional content checksum.
const FRAME_FOOTER: usize = 8;

/// Encoded block size used by `lz4_flex`'s default frame settings.
const BLOCK_SIZE: usize = 64 * 1024;

/// Size header (and optional checksum) in front of every block, padded up.
const PER_BLOCK_OVERHEAD: usize = 8;

/// The LZ4 [`FrameCodec`].
pub struct Lz4Codec;

impl FrameCodec for Lz4Codec {
    type Encoder = Lz4Encoder;
    type Decoder = Lz4Decoder;

    const NAME: &'static str = "lz4";
    // LZ4 frames share the 0x184D2A5x skippable range; stock LZ4 frame
    // decoders step over the envelope exactly like zstd decoders do.
    const SKIPPABLE_MAGIC: u32 = 0x184D_2A50;
    // The LZ4/LZ5 family accepts levels up to 15.  Every level encodes
    // identically here (single-speed parser); the range is kept so streams
    // configured for other encoders of the family validate unchanged.
    const LEVEL_MAX: i32 = 15;

    fn compress_bound(src_len: usize) -> usize {
        // Incompressible blocks are stored raw, so the payload can exceed
        // the input only by framing overhead.
        let blocks = src_len / BLOCK_SIZE + 1;
        MAX_FRAME_HEADER + FRAME_FOOTER + src_len + blocks * PER_BLOCK_OVERHEAD
    }

    fn default_chunk_size(_level: i32) -> usize {
        4 << 20
    }

    fn new_encoder(_level: i32) -> Result<Lz4Encoder> {
        Ok(Lz4Encoder)
    }

    fn new_decoder() -> Result<Lz4Decoder> {
        Ok(Lz4Decoder)
    }
}

/// Stateless marker: the frame encoder is rebuilt around each destination
/// buffer, which is how `lz4_flex` models one-frame-per-call use.
pub struct Lz4Encoder;

impl FrameEncoder for Lz4Encoder {
    fn compress_frame(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let mut cursor = std::io::Cursor::new(dst);
        let mut encoder = lz4_flex::frame::FrameEncoder::new(&mut cursor);
        encoder.write_all(src).map_err(lib_error)?;
        encoder
            .finish()
            .map_err(|e| Error::CompressionLibrary {
                codec: Lz4Codec::NAME,
                detail: e.to_string(),
            })?;
        Ok(cursor.position() as usize)
    }
}

/// Stateless marker; see [`Lz4Encoder`].
pub struct Lz4Decoder;

impl FrameDecoder for Lz4Decoder {
    fn frame_content_size(&self, _payload: &[u8]) -> Option<usize> {
        // Default frames do not declare a content size; callers fall back to
        // the configured per-frame ceiling.
        None
    }

    fn decompress_frame(&mut self, payload: &[u8], dst: &mut [u8]) -> Result<usize> {
        let mut decoder = lz4_flex::frame::FrameDecoder::new(payload);
        let mut total = 0;
        loop {
            if total == dst.len() {
                // Buffer full: any further byte means the frame outgrew the
                // configured ceiling.
                let mut probe = [0u8; 1];
                match decoder.read(&mut probe) {
                    Ok(0) => break,
                    Ok(_) => return Err(Error::FrameDecompress),
                    Err(e) => return Err(lib_error(e)),
                }
            }
            match decoder.read(&mut dst[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(lib_error(e)),
            }
        }
        Ok(total)
    }
}

fn lib_error(e: std::io::Error) -> Error {
    Error::CompressionLibrary {
        codec: Lz4Codec::NAME,
        detail: e.to_string(),
    }
}
