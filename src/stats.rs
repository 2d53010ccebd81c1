//! Running byte and frame counters, shared between workers and observers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a context's progress counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Total bytes accepted from the read callback.
    pub insize: u64,
    /// Total bytes delivered to the write callback, envelopes included.
    pub outsize: u64,
    /// Number of frames emitted so far (the next frame index due out).
    pub frames_emitted: u64,
}

/// Interior counters.  `insize` and `next_frame` are only written under the
/// read mutex, `outsize` and `next_emit` only under the write mutex; the
/// atomics exist so observers on other threads can take a lag-tolerant
/// snapshot without either lock.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub insize: AtomicU64,
    pub outsize: AtomicU64,
    pub next_frame: AtomicU64,
    pub next_emit: AtomicU64,
}

impl Counters {
    pub fn snapshot(&self) -> Stats {
        Stats {
            insize: self.insize.load(Ordering::Relaxed),
            outsize: self.outsize.load(Ordering::Relaxed),
            frames_emitted: self.next_emit.load(Ordering::Relaxed),
        }
    }
}
