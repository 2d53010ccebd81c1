//! The adapter seam between the worker engine and a concrete single-frame
//! codec.
//!
//! The engine knows nothing about compression formats.  It asks a
//! [`FrameCodec`] for per-worker encoder/decoder contexts at construction
//! time, then drives them one whole chunk at a time: every
//! [`FrameEncoder::compress_frame`] call must produce one self-contained
//! frame that [`FrameDecoder::decompress_frame`] (or any stock decoder of the
//! same format) can decode in isolation.  Contexts are never shared between
//! workers, so implementations are free to carry mutable scratch state.
//!
//! | Backend | Module | Frame format |
//! |---------|--------|--------------|
//! | Zstandard | [`zstd`] | one zstd frame per chunk |
//! | LZ4 | [`lz4`] | one LZ4 frame per chunk |

pub mod lz4;
pub mod zstd;

pub use lz4::Lz4Codec;
pub use zstd::ZstdCodec;

use crate::error::Result;

/// A pluggable single-frame codec: the static facts the engine needs, plus
/// factories for per-worker contexts.
pub trait FrameCodec {
    /// Per-worker compression context.
    type Encoder: FrameEncoder;
    /// Per-worker decompression context.
    type Decoder: FrameDecoder;

    /// Short identifier used in logs and error values.
    const NAME: &'static str;

    /// Magic number for the envelope, taken from the codec's skippable-frame
    /// range so stock decoders of the format step over envelopes silently.
    const SKIPPABLE_MAGIC: u32;

    /// Highest accepted compression level.  Levels start at 1.
    const LEVEL_MAX: i32;

    /// Worst-case compressed size of `src_len` input bytes.  Output slots
    /// are sized from this; exceeding it is a codec bug.
    fn compress_bound(src_len: usize) -> usize;

    /// Default uncompressed chunk size for `level`, used when the host
    /// passes `chunk_size == 0`.
    fn default_chunk_size(level: i32) -> usize;

    /// Create one encoder context pinned to `level`.
    fn new_encoder(level: i32) -> Result<Self::Encoder>;

    /// Create one decoder context.
    fn new_decoder() -> Result<Self::Decoder>;
}

/// Reusable compression context owned by a single worker.
pub trait FrameEncoder: Send {
    /// Compress `src` into `dst` as one independent frame, returning the
    /// compressed size.  The context resets itself; no state carries over
    /// between frames.
    fn compress_frame(&mut self, src: &[u8], dst: &mut [u8]) -> Result<usize>;
}

/// Reusable decompression context owned by a single worker.
pub trait FrameDecoder: Send {
    /// Exact decompressed size of `payload`, when the frame declares one.
    fn frame_content_size(&self, payload: &[u8]) -> Option<usize>;

    /// Decode one complete frame from `payload` into `dst`, returning the
    /// decompressed size.  Fails if the frame is corrupt or decodes to more
    /// than `dst.len()` bytes.
    fn decompress_frame(&mut self, payload: &[u8], dst: &mut [u8]) -> Result<usize>;
}
