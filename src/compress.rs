//! Multi-threaded streaming compression.
//!
//! A [`CompressionContext`] owns a fixed set of per-worker codec contexts.
//! [`CompressionContext::run`] spawns one OS thread per worker; each thread
//! loops independently with no coordinator:
//!
//! 1. take an output slot from the pool (write lock);
//! 2. read one chunk and claim the next frame index (read lock);
//! 3. compress the chunk into the slot at the envelope offset (no locks);
//! 4. stamp the envelope, file the slot as done, and drain every
//!    head-of-line frame to the write callback (write lock).
//!
//! Workers finish out of order, but the done map plus the `next_emit` cursor
//! re-serialize the stream: the host sees frames in exact input order.  A
//! worker that hits a zero-length read has found end of input and exits;
//! the run ends when all workers have.

use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::thread;

use log::{debug, trace};

use crate::buffer::Buffer;
use crate::codec::{FrameCodec, FrameEncoder};
use crate::config::{CHUNK_SIZE_MAX, THREAD_MAX};
use crate::envelope::{self, ENVELOPE_SIZE};
use crate::error::{Error, Result};
use crate::rdwr::RdWr;
use crate::slots::SlotPool;
use crate::stats::{Counters, Stats};
use crate::worker::{fail_slot, join_workers, lock, ReadSide, WriteSide};

/// Construction parameters for a [`CompressionContext`].
#[derive(Debug, Clone, Copy)]
pub struct CompressOptions {
    /// Worker thread count, `1..=THREAD_MAX`.
    pub threads: usize,
    /// Compression level, `1..=`[`FrameCodec::LEVEL_MAX`].
    pub level: i32,
    /// Uncompressed bytes per frame; `0` selects the codec's default for
    /// the level.
    pub chunk_size: usize,
}

impl CompressOptions {
    /// Options with the codec's default chunk size.
    pub fn new(threads: usize, level: i32) -> Self {
        CompressOptions {
            threads,
            level,
            chunk_size: 0,
        }
    }
}

/// The multi-threaded compression engine for one codec backend.
pub struct CompressionContext<C: FrameCodec> {
    level: i32,
    chunk_size: usize,
    encoders: Vec<C::Encoder>,
    counters: Counters,
}

impl<C: FrameCodec> std::fmt::Debug for CompressionContext<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionContext")
            .field("level", &self.level)
            .field("chunk_size", &self.chunk_size)
            .field("workers", &self.encoders.len())
            .field("counters", &self.counters)
            .finish()
    }
}

impl<C: FrameCodec> CompressionContext<C> {
    /// Validate `opts` and allocate the per-worker codec contexts.
    ///
    /// Workers are not started here; that happens in [`run`](Self::run).
    pub fn new(opts: CompressOptions) -> Result<Self> {
        if opts.threads < 1 || opts.threads > THREAD_MAX {
            return Err(Error::BadParameter("threads"));
        }
        if opts.level < 1 || opts.level > C::LEVEL_MAX {
            return Err(Error::BadParameter("level"));
        }
        if opts.chunk_size > CHUNK_SIZE_MAX {
            return Err(Error::BadParameter("chunk_size"));
        }
        let chunk_size = if opts.chunk_size == 0 {
            C::default_chunk_size(opts.level)
        } else {
            opts.chunk_size
        };
        let mut encoders = Vec::with_capacity(opts.threads);
        for _ in 0..opts.threads {
            encoders.push(C::new_encoder(opts.level)?);
        }
        Ok(CompressionContext {
            level: opts.level,
            chunk_size,
            encoders,
            counters: Counters::default(),
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.encoders.len()
    }

    /// Configured compression level.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Effective uncompressed bytes per frame.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Lag-tolerant snapshot of the progress counters.
    pub fn stats(&self) -> Stats {
        self.counters.snapshot()
    }

    /// Compress everything `rdwr.read` yields into `rdwr.write`.
    ///
    /// Spawns the workers, joins all of them, and returns the first worker
    /// error (if any) or the final [`Stats`].  On failure the remaining
    /// workers are still joined and every slot is reclaimed; the context
    /// stays usable for inspection and can be dropped safely.
    pub fn run(&mut self, rdwr: RdWr<'_>) -> Result<Stats> {
        debug!(
            "compress run: codec={} workers={} level={} chunk={}",
            C::NAME,
            self.encoders.len(),
            self.level,
            self.chunk_size
        );
        let slot_capacity = C::compress_bound(self.chunk_size) + ENVELOPE_SIZE;
        let chunk_size = self.chunk_size;
        let counters = &self.counters;
        let reader = Mutex::new(ReadSide { read: rdwr.read });
        let writer = Mutex::new(WriteSide {
            write: rdwr.write,
            pool: SlotPool::new(),
        });

        let result = thread::scope(|s| {
            let mut handles = Vec::with_capacity(self.encoders.len());
            for (id, encoder) in self.encoders.iter_mut().enumerate() {
                let reader = &reader;
                let writer = &writer;
                handles.push(s.spawn(move || {
                    compress_worker::<C>(
                        id,
                        encoder,
                        chunk_size,
                        slot_capacity,
                        reader,
                        writer,
                        counters,
                    )
                }));
            }
            join_workers(handles)
        });

        let side = writer.into_inner().unwrap_or_else(|p| p.into_inner());
        if result.is_ok() {
            debug_assert_eq!(side.pool.busy_count(), 0, "worker leaked a slot");
            debug_assert_eq!(side.pool.done_count(), 0, "unemitted frame after clean run");
        }
        drop(side); // every remaining slot buffer is reclaimed here

        result?;
        let stats = self.counters.snapshot();
        debug!(
            "compress run done: {} -> {} bytes, {} frames",
            stats.insize, stats.outsize, stats.frames_emitted
        );
        Ok(stats)
    }
}

/// One worker's life: loop until end of input or error.
fn compress_worker<C: FrameCodec>(
    worker: usize,
    encoder: &mut C::Encoder,
    chunk_size: usize,
    slot_capacity: usize,
    reader: &Mutex<ReadSide<'_>>,
    writer: &Mutex<WriteSide<'_>>,
    counters: &Counters,
) -> Result<()> {
    // Private input buffer, reused across frames, never shared.
    let mut input = Buffer::with_capacity(chunk_size)?;
    trace!("compress worker {worker} up");

    loop {
        // The slot is taken before the read so that a worker holding a frame
        // number can never stall on allocation behind its siblings.
        let mut slot = lock(writer).pool.acquire(slot_capacity)?;

        let len;
        {
            let mut rd = lock(reader);
            match (rd.read)(input.space_mut()) {
                Err(e) => {
                    drop(rd);
                    return Err(fail_slot(writer, slot, Error::ReadFail(e)));
                }
                Ok(0) => {
                    drop(rd);
                    lock(writer).pool.release(slot);
                    trace!("compress worker {worker}: end of input");
                    return Ok(());
                }
                Ok(n) if n > chunk_size => {
                    drop(rd);
                    let err = std::io::Error::other("read callback produced more than requested");
                    return Err(fail_slot(writer, slot, Error::ReadFail(err)));
                }
                Ok(n) => {
                    // Frame index assignment shares the read lock so frame
                    // numbers follow input order exactly.
                    counters.insize.fetch_add(n as u64, Ordering::Relaxed);
                    slot.frame = counters.next_frame.fetch_add(1, Ordering::Relaxed);
                    len = n;
                }
            }
        }
        input.set_size(len);

        let payload = {
            let dst = &mut slot.out.space_mut()[ENVELOPE_SIZE..];
            match encoder.compress_frame(input.filled(), dst) {
                Ok(n) => n,
                Err(e) => return Err(fail_slot(writer, slot, e)),
            }
        };
        envelope::write_header(slot.out.space_mut(), C::SKIPPABLE_MAGIC, payload as u32);
        slot.out.set_size(ENVELOPE_SIZE + payload);
        trace!(
            "compress worker {worker}: frame {} ({len} -> {payload} bytes)",
            slot.frame
        );

        lock(writer).finish_and_emit(slot, counters)?;
    }
}
