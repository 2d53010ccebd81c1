//! `zmt` — multi-threaded streaming frame compression with in-order output.
//!
//! A fixed pool of shared-nothing workers reads one input stream through a
//! host-supplied callback, slices it into chunks, compresses each chunk as an
//! independent frame on whichever worker gets there first, and re-serializes
//! the finished frames to the output callback in exact input order.  Each
//! compressed frame travels inside a 12-byte skippable-frame envelope, so the
//! stream also decodes with a stock single-threaded decoder of the underlying
//! format.  Decompression runs the same machinery in reverse.
//!
//! # Crate layout
//!
//! | Module       | Contents |
//! |--------------|----------|
//! | `compress`   | [`CompressionContext`]: worker pool, in-order emit, stats. |
//! | `decompress` | [`DecompressionContext`]: the symmetric engine. |
//! | `codec`      | [`FrameCodec`] adapter seam + [`ZstdCodec`] / [`Lz4Codec`] backends. |
//! | `envelope`   | The skippable-frame envelope around each payload. |
//! | `rdwr`       | [`RdWr`] host I/O hooks and `Read`/`Write` adapters. |
//! | `buffer`     | Fixed-capacity buffers with an explicit valid length. |
//! | `error`      | [`Error`] taxonomy shared by both directions. |
//! | `config`     | Engine-wide limits and defaults. |
//! | `stats`      | [`Stats`] progress snapshots. |
//!
//! # Example
//!
//! ```no_run
//! use zmt::{compress_stream, decompress_stream, CompressOptions, DecompressOptions, ZstdCodec};
//!
//! # fn main() -> zmt::Result<()> {
//! let mut input = std::io::stdin();
//! let mut output = std::io::stdout();
//! let stats = compress_stream::<ZstdCodec, _, _>(
//!     CompressOptions { threads: 4, level: 3, chunk_size: 0 },
//!     &mut input,
//!     &mut output,
//! )?;
//! eprintln!("{} -> {} bytes", stats.insize, stats.outsize);
//! # Ok(())
//! # }
//! ```

pub mod buffer;
pub mod codec;
pub mod compress;
pub mod config;
pub mod decompress;
pub mod envelope;
pub mod error;
pub mod rdwr;
pub mod stats;

mod slots;
mod worker;

pub use codec::{FrameCodec, FrameDecoder, FrameEncoder, Lz4Codec, ZstdCodec};
pub use compress::{CompressOptions, CompressionContext};
pub use decompress::{DecompressOptions, DecompressionContext};
pub use error::{Error, Result};
pub use rdwr::RdWr;
pub use stats::Stats;

use std::io::{Read, Write};

/// One-call compression between a [`Read`] source and a [`Write`] sink.
///
/// Builds a [`CompressionContext`], adapts the endpoints with
/// [`RdWr::from_streams`], runs to end of input, and returns the final
/// [`Stats`].
pub fn compress_stream<C, R, W>(opts: CompressOptions, reader: &mut R, writer: &mut W) -> Result<Stats>
where
    C: FrameCodec,
    R: Read + Send + ?Sized,
    W: Write + Send + ?Sized,
{
    let mut ctx = CompressionContext::<C>::new(opts)?;
    ctx.run(RdWr::from_streams(reader, writer))
}

/// One-call decompression between a [`Read`] source and a [`Write`] sink.
pub fn decompress_stream<C, R, W>(
    opts: DecompressOptions,
    reader: &mut R,
    writer: &mut W,
) -> Result<Stats>
where
    C: FrameCodec,
    R: Read + Send + ?Sized,
    W: Write + Send + ?Sized,
{
    let mut ctx = DecompressionContext::<C>::new(opts)?;
    ctx.run(RdWr::from_streams(reader, writer))
}
