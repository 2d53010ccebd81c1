//! Error taxonomy for the multi-threaded engine.
//!
//! Every failure a context can surface is one of the [`Error`] variants below.
//! Worker threads return the variant that stopped them; the join phase hands
//! the first one to the caller.  Codec-reported failures keep the backend's
//! own diagnostic text so callers can log the native reason without this
//! crate re-interpreting it.

use core::fmt;
use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by compression and decompression contexts.
#[derive(Debug)]
pub enum Error {
    /// A configuration value was out of range.  The payload names the
    /// offending parameter.
    BadParameter(&'static str),
    /// A buffer or codec context could not be allocated.
    OutOfMemory,
    /// The host read callback reported a failure.
    ReadFail(io::Error),
    /// The host write callback reported a failure or consumed only part of a
    /// frame.
    WriteFail(io::Error),
    /// The input stream violates the framing format: bad magic, truncated
    /// envelope or payload, or a length field beyond the configured bounds.
    DataError(String),
    /// The codec finished a frame without consuming the whole input chunk.
    FrameCompress,
    /// A decoded frame did not match its declared size, or outgrew the
    /// configured output ceiling.
    FrameDecompress,
    /// The underlying codec library reported an error of its own.  `detail`
    /// carries the library's native diagnostic string.
    CompressionLibrary {
        /// Short codec identifier, e.g. `"zstd"`.
        codec: &'static str,
        /// The backend's own description of the failure.
        detail: String,
    },
}

impl Error {
    /// Stable, machine-matchable name of the error kind.
    pub fn error_name(&self) -> &'static str {
        match self {
            Error::BadParameter(_) => "bad_parameter",
            Error::OutOfMemory => "out_of_memory",
            Error::ReadFail(_) => "read_fail",
            Error::WriteFail(_) => "write_fail",
            Error::DataError(_) => "data_error",
            Error::FrameCompress => "frame_compress",
            Error::FrameDecompress => "frame_decompress",
            Error::CompressionLibrary { .. } => "compression_library",
        }
    }

    /// Native diagnostic text of a codec-reported failure, if this is one.
    pub fn codec_detail(&self) -> Option<&str> {
        match self {
            Error::CompressionLibrary { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadParameter(what) => write!(f, "parameter out of range: {what}"),
            Error::OutOfMemory => f.write_str("allocation failed"),
            Error::ReadFail(e) => write!(f, "read callback failed: {e}"),
            Error::WriteFail(e) => write!(f, "write callback failed: {e}"),
            Error::DataError(what) => write!(f, "malformed input stream: {what}"),
            Error::FrameCompress => f.write_str("codec left part of a chunk unconsumed"),
            Error::FrameDecompress => f.write_str("decoded frame size mismatch"),
            Error::CompressionLibrary { codec, detail } => {
                write!(f, "{codec} library error: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadFail(e) | Error::WriteFail(e) => Some(e),
            _ => None,
        }
    }
}
