//! Compile-time limits and defaults for the worker engine.
//!
//! Codec-specific tunables (level ranges, default chunk tables) live with the
//! codec adapters in [`crate::codec`]; this module only holds the knobs that
//! apply to every backend.

/// Hard upper bound on the number of worker threads per context.
///
/// Requests above this value are rejected with
/// [`Error::BadParameter`](crate::error::Error::BadParameter) rather than
/// clamped, so a host that asks for more workers than the engine supports
/// finds out immediately.
pub const THREAD_MAX: usize = 128;

/// Hard upper bound on the per-frame chunk size (1 GiB).
///
/// The envelope stores the compressed payload length in 32 bits; keeping the
/// uncompressed chunk at or below this bound guarantees the worst-case
/// compressed payload still fits.
pub const CHUNK_SIZE_MAX: usize = 1 << 30;

/// Default output-size ceiling per frame during decompression, used when the
/// caller passes `chunk_size == 0`.
///
/// Matches the largest default chunk any compression level produces, so a
/// stream compressed with default settings always decompresses with default
/// settings.
pub const DECOMPRESS_CHUNK_DEFAULT: usize = 16 << 20;
