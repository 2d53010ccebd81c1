//! Host I/O hooks: the read/write callback pair a context runs against.
//!
//! The engine never opens files or sockets.  A host hands it an [`RdWr`]
//! holding two closures:
//!
//! - `read`: fill up to `buf.len()` bytes, return how many were produced.
//!   `Ok(0)` means end of input and must stay `Ok(0)` on every later call
//!   (workers discover EOF independently).  During compression, each
//!   successful call defines one frame's worth of input.
//! - `write`: consume the whole slice or fail.  Partial writes are the
//!   closure's problem to hide (`write_all` semantics).
//!
//! The engine serializes all `read` calls behind one mutex and all `write`
//! calls behind another, so the closures themselves never see concurrent
//! invocations.

use std::io::{self, Read, Write};

/// Read hook: fills the slice prefix, returns the byte count, `Ok(0)` at EOF.
pub type ReadFn<'a> = Box<dyn FnMut(&mut [u8]) -> io::Result<usize> + Send + 'a>;

/// Write hook: consumes the whole slice or fails.
pub type WriteFn<'a> = Box<dyn FnMut(&[u8]) -> io::Result<()> + Send + 'a>;

/// The callback pair handed to [`CompressionContext::run`] /
/// [`DecompressionContext::run`].
///
/// [`CompressionContext::run`]: crate::compress::CompressionContext::run
/// [`DecompressionContext::run`]: crate::decompress::DecompressionContext::run
pub struct RdWr<'a> {
    pub read: ReadFn<'a>,
    pub write: WriteFn<'a>,
}

impl<'a> RdWr<'a> {
    /// Wrap two closures.
    pub fn new(
        read: impl FnMut(&mut [u8]) -> io::Result<usize> + Send + 'a,
        write: impl FnMut(&[u8]) -> io::Result<()> + Send + 'a,
    ) -> Self {
        RdWr {
            read: Box::new(read),
            write: Box::new(write),
        }
    }

    /// Adapt a plain [`Read`]/[`Write`] pair.
    ///
    /// The read side loop-fills the whole buffer before returning, so every
    /// frame except the last covers a full chunk regardless of how the
    /// underlying reader fragments its data.  That keeps frame boundaries —
    /// and therefore the compressed bytes — deterministic for a given input.
    pub fn from_streams<R, W>(reader: &'a mut R, writer: &'a mut W) -> Self
    where
        R: Read + Send + ?Sized,
        W: Write + Send + ?Sized,
    {
        RdWr::new(
            move |buf| read_to_capacity(&mut *reader, buf),
            move |bytes| writer.write_all(bytes),
        )
    }
}

/// Fill `buf` completely from `reader`, short only at end of input.
/// Retries on [`io::ErrorKind::Interrupted`].
pub fn read_to_capacity<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
