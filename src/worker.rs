//! Shared worker-pool plumbing: the two lock-guarded callback sides and the
//! in-order emit procedure, used identically by the compression and
//! decompression contexts.
//!
//! Locking model (the same for both directions):
//!
//! - the **read side** serializes the read callback, `insize`, and frame
//!   index assignment, so frame numbers follow input byte order exactly;
//! - the **write side** serializes the slot pool, the write callback,
//!   `outsize`, and `next_emit`;
//! - no worker ever holds both locks at once.

use std::io;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use log::trace;

use crate::error::{Error, Result};
use crate::rdwr::{ReadFn, WriteFn};
use crate::slots::{Slot, SlotPool};
use crate::stats::Counters;

/// State guarded by the read mutex.
pub(crate) struct ReadSide<'a> {
    pub read: ReadFn<'a>,
}

/// State guarded by the write mutex.
pub(crate) struct WriteSide<'a> {
    pub write: WriteFn<'a>,
    pub pool: SlotPool,
}

impl WriteSide<'_> {
    /// File `slot` as finished, then drain every consecutive head-of-line
    /// frame to the write callback.
    ///
    /// This is the only place the write callback is ever invoked.  Each
    /// successful write advances `next_emit` by exactly one, so frames reach
    /// the host in strict index order with no gaps and no duplicates — no
    /// matter which worker happens to run the drain.
    pub fn finish_and_emit(&mut self, slot: Slot, counters: &Counters) -> Result<()> {
        self.pool.finish(slot);
        loop {
            let next = counters.next_emit.load(Ordering::Relaxed);
            let Some(slot) = self.pool.pop_ready(next) else {
                return Ok(());
            };
            match (self.write)(slot.out.filled()) {
                Ok(()) => {
                    counters
                        .outsize
                        .fetch_add(slot.out.size() as u64, Ordering::Relaxed);
                    counters.next_emit.fetch_add(1, Ordering::Relaxed);
                    trace!("emitted frame {next} ({} bytes)", slot.out.size());
                    self.pool.recycle(slot);
                }
                Err(e) => {
                    self.pool.recycle(slot);
                    return Err(Error::WriteFail(e));
                }
            }
        }
    }
}

/// Return a worker-held slot on an abort path, then hand back the error.
pub(crate) fn fail_slot(writer: &Mutex<WriteSide<'_>>, slot: Slot, err: Error) -> Error {
    lock(writer).pool.release(slot);
    err
}

/// Fill `buf` completely through the read callback, short only at end of
/// input.  Used where the engine, not the host, knows how many bytes the
/// framing requires next.
pub(crate) fn read_full(read: &mut ReadFn<'_>, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = (read)(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

/// Lock helper: a poisoned engine mutex means another worker panicked, which
/// is always an engine bug; propagating the panic is the only sane answer.
pub(crate) fn lock<'m, T>(mutex: &'m Mutex<T>) -> std::sync::MutexGuard<'m, T> {
    mutex.lock().expect("engine mutex poisoned by a worker panic")
}

/// Join the worker handles, propagating panics, and surface the first error
/// while still joining every remaining worker.
pub(crate) fn join_workers(
    handles: Vec<std::thread::ScopedJoinHandle<'_, Result<()>>>,
) -> Result<()> {
    let mut first_err = None;
    for handle in handles {
        let result = match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        if let Err(e) = result {
            if first_err.is_none() {
                first_err = Some(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
