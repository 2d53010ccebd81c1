//! Zstandard backend: one reusable `CCtx`/`DCtx` per worker via the `zstd`
//! crate's bulk API.
//!
//! Each `compress_frame` call is a single-shot compression, which resets the
//! context's session, pins the source size, and writes it into the frame
//! header — so every payload is an independent zstd frame that carries its
//! own decompressed size.

use crate::codec::{FrameCodec, FrameDecoder, FrameEncoder};
use crate::error::{Error, Result};

/// MiB of uncompressed input per frame, indexed by `level - 1`.  Low levels
/// favor small chunks for parallelism; high levels get large chunks so the
/// compressor sees enough history to earn its cost.
const DEFAULT_CHUNK_MIB: [usize; 22] = [
    2, 2, 4, 4, 6, 6, 6, // levels 1-7
    8, 8, 8, 8, 8, 8, 8, // levels 8-14
    16, 16, 16, 16, 16, 16, 16, 16, // levels 15-22
];

/// The Zstandard [`FrameCodec`].
pub struct ZstdCodec;

impl FrameCodec for ZstdCodec {
    type Encoder = ZstdEncoder;
    type Decoder = ZstdDecoder;

    const NAME: &'static str = "zstd";
    const SKIPPABLE_MAGIC: u32 = 0x184D_2A50;
    const LEVEL_MAX: i32 = 22;

    fn compress_bound(src_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(src_len)
    }

    fn default_chunk_size(level: i32) -> usize {
        DEFAULT_CHUNK_MIB[(level - 1) as usize] << 20
    }

    fn new_encoder(level: i32) -> Result<ZstdEncoder> {
        // Level range is validated by the context; a failure here is the
        // library failing to allocate its context.
        let cctx = zstd::bulk::Compressor::new(level).map_err(|_| Error::OutOfMemory)?;
        Ok(ZstdEncoder { cctx })
    }

    fn new_decoder() -> Result<ZstdDecoder> {
        let dctx = zstd::bulk::Decompressor::new().map_err(|_| Error::OutOfMemory)?;
        Ok(ZstdDecoder { dctx })
    }
}

/// One worker's compression context.
pub struct ZstdEncoder {
    cctx: zstd::bulk::Compressor<'static>,
}

impl FrameEncoder for ZstdEncoder {
    fn compress_frame(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        self.cctx
            .compress_to_buffer(src, dst)
            .map_err(|e| Error::CompressionLibrary {
                codec: ZstdCodec::NAME,
                detail: e.to_string(),
            })
    }
}

/// One worker's decompression context.
pub struct ZstdDecoder {
    dctx: zstd::bulk::Decompressor<'static>,
}

impl FrameDecoder for ZstdDecoder {
    fn frame_content_size(&self, payload: &[u8]) -> Option<usize> {
        zstd::zstd_safe::get_frame_content_size(payload)
            .ok()
            .flatten()
            .map(|n| n as usize)
    }

    fn decompress_frame(&mut self, payload: &[u8], dst: &mut [u8]) -> Result<usize> {
        self.dctx
            .decompress_to_buffer(payload, dst)
            .map_err(|e| Error::CompressionLibrary {
                codec: ZstdCodec::NAME,
                detail: e.to_string(),
            })
    }
}
