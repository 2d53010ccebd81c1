//! Multi-threaded streaming decompression: the mirror image of
//! [`crate::compress`].
//!
//! The engine owns the framing.  Under the read lock a worker pulls one
//! 12-byte envelope, learns the payload length, pulls exactly that many
//! payload bytes, and claims the next frame index.  Payloads are independent
//! frames, so decoding happens outside every lock and frames may decode in
//! any order; the shared done map re-serializes them before the write
//! callback sees anything.
//!
//! There is no compression level here.  `chunk_size` survives as the
//! per-frame decompressed-size ceiling (`0` selects
//! [`DECOMPRESS_CHUNK_DEFAULT`](crate::config::DECOMPRESS_CHUNK_DEFAULT)),
//! bounding both output buffers and how large a payload the engine will
//! believe an envelope about.

use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::thread;

use log::{debug, trace};

use crate::codec::{FrameCodec, FrameDecoder};
use crate::config::{CHUNK_SIZE_MAX, DECOMPRESS_CHUNK_DEFAULT, THREAD_MAX};
use crate::envelope::{self, ENVELOPE_SIZE};
use crate::error::{Error, Result};
use crate::rdwr::RdWr;
use crate::slots::SlotPool;
use crate::stats::{Counters, Stats};
use crate::worker::{fail_slot, join_workers, lock, read_full, ReadSide, WriteSide};

/// Construction parameters for a [`DecompressionContext`].
#[derive(Debug, Clone, Copy)]
pub struct DecompressOptions {
    /// Worker thread count, `1..=THREAD_MAX`.
    pub threads: usize,
    /// Per-frame decompressed-size ceiling; `0` selects the default.
    pub chunk_size: usize,
}

impl DecompressOptions {
    /// Options with the default size ceiling.
    pub fn new(threads: usize) -> Self {
        DecompressOptions {
            threads,
            chunk_size: 0,
        }
    }
}

/// The multi-threaded decompression engine for one codec backend.
pub struct DecompressionContext<C: FrameCodec> {
    chunk_size: usize,
    decoders: Vec<C::Decoder>,
    counters: Counters,
}

impl<C: FrameCodec> DecompressionContext<C> {
    /// Validate `opts` and allocate the per-worker codec contexts.
    pub fn new(opts: DecompressOptions) -> Result<Self> {
        if opts.threads < 1 || opts.threads > THREAD_MAX {
            return Err(Error::BadParameter("threads"));
        }
        if opts.chunk_size > CHUNK_SIZE_MAX {
            return Err(Error::BadParameter("chunk_size"));
        }
        let chunk_size = if opts.chunk_size == 0 {
            DECOMPRESS_CHUNK_DEFAULT
        } else {
            opts.chunk_size
        };
        let mut decoders = Vec::with_capacity(opts.threads);
        for _ in 0..opts.threads {
            decoders.push(C::new_decoder()?);
        }
        Ok(DecompressionContext {
            chunk_size,
            decoders,
            counters: Counters::default(),
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.decoders.len()
    }

    /// Effective per-frame decompressed-size ceiling.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Lag-tolerant snapshot of the progress counters.
    pub fn stats(&self) -> Stats {
        self.counters.snapshot()
    }

    /// Decompress everything `rdwr.read` yields into `rdwr.write`.
    ///
    /// Same join and teardown contract as
    /// [`CompressionContext::run`](crate::compress::CompressionContext::run).
    pub fn run(&mut self, rdwr: RdWr<'_>) -> Result<Stats> {
        debug!(
            "decompress run: codec={} workers={} limit={}",
            C::NAME,
            self.decoders.len(),
            self.chunk_size
        );
        let limit = self.chunk_size;
        let counters = &self.counters;
        let reader = Mutex::new(ReadSide { read: rdwr.read });
        let writer = Mutex::new(WriteSide {
            write: rdwr.write,
            pool: SlotPool::new(),
        });

        let result = thread::scope(|s| {
            let mut handles = Vec::with_capacity(self.decoders.len());
            for (id, decoder) in self.decoders.iter_mut().enumerate() {
                let reader = &reader;
                let writer = &writer;
                handles.push(s.spawn(move || {
                    decompress_worker::<C>(id, decoder, limit, reader, writer, counters)
                }));
            }
            join_workers(handles)
        });

        let side = writer.into_inner().unwrap_or_else(|p| p.into_inner());
        if result.is_ok() {
            debug_assert_eq!(side.pool.busy_count(), 0, "worker leaked a slot");
            debug_assert_eq!(side.pool.done_count(), 0, "unemitted frame after clean run");
        }
        drop(side);

        result?;
        let stats = self.counters.snapshot();
        debug!(
            "decompress run done: {} -> {} bytes, {} frames",
            stats.insize, stats.outsize, stats.frames_emitted
        );
        Ok(stats)
    }
}

fn decompress_worker<C: FrameCodec>(
    worker: usize,
    decoder: &mut C::Decoder,
    limit: usize,
    reader: &Mutex<ReadSide<'_>>,
    writer: &Mutex<WriteSide<'_>>,
    counters: &Counters,
) -> Result<()> {
    // Private compressed-payload buffer; grows to the largest frame seen.
    let mut payload: Vec<u8> = Vec::new();
    // A well-formed payload for a frame within `limit` can never exceed the
    // codec's bound on `limit` bytes; longer length fields are lies.
    let payload_limit = C::compress_bound(limit);
    trace!("decompress worker {worker} up");

    loop {
        let mut slot = lock(writer).pool.acquire(0)?;

        let payload_len;
        {
            let mut rd = lock(reader);
            let mut header = [0u8; ENVELOPE_SIZE];
            let got = match read_full(&mut rd.read, &mut header) {
                Ok(got) => got,
                Err(e) => {
                    drop(rd);
                    return Err(fail_slot(writer, slot, Error::ReadFail(e)));
                }
            };
            if got == 0 {
                drop(rd);
                lock(writer).pool.release(slot);
                trace!("decompress worker {worker}: end of input");
                return Ok(());
            }
            if got < ENVELOPE_SIZE {
                drop(rd);
                let err = Error::DataError(format!(
                    "truncated envelope: {got} of {ENVELOPE_SIZE} bytes"
                ));
                return Err(fail_slot(writer, slot, err));
            }
            payload_len = match envelope::parse_header(&header, C::SKIPPABLE_MAGIC) {
                Ok(len) => len,
                Err(e) => {
                    drop(rd);
                    return Err(fail_slot(writer, slot, e));
                }
            };
            if payload_len > payload_limit {
                drop(rd);
                let err = Error::DataError(format!(
                    "payload length {payload_len} exceeds bound {payload_limit}"
                ));
                return Err(fail_slot(writer, slot, err));
            }
            if payload.len() < payload_len {
                let grow = payload_len - payload.len();
                if payload.try_reserve_exact(grow).is_err() {
                    drop(rd);
                    return Err(fail_slot(writer, slot, Error::OutOfMemory));
                }
                payload.resize(payload_len, 0);
            }
            match read_full(&mut rd.read, &mut payload[..payload_len]) {
                Ok(got) if got == payload_len => {}
                Ok(got) => {
                    drop(rd);
                    let err = Error::DataError(format!(
                        "truncated payload: {got} of {payload_len} bytes"
                    ));
                    return Err(fail_slot(writer, slot, err));
                }
                Err(e) => {
                    drop(rd);
                    return Err(fail_slot(writer, slot, Error::ReadFail(e)));
                }
            }
            counters
                .insize
                .fetch_add((ENVELOPE_SIZE + payload_len) as u64, Ordering::Relaxed);
            slot.frame = counters.next_frame.fetch_add(1, Ordering::Relaxed);
        }

        // Decode outside both locks; the frame is self-contained.
        let frame_payload = &payload[..payload_len];
        let hint = decoder.frame_content_size(frame_payload);
        let out_cap = match hint {
            Some(n) if n > limit => {
                let err =
                    Error::DataError(format!("frame declares {n} bytes, ceiling is {limit}"));
                return Err(fail_slot(writer, slot, err));
            }
            Some(n) => n,
            None => limit,
        };
        if let Err(e) = slot.out.ensure_capacity(out_cap) {
            return Err(fail_slot(writer, slot, e));
        }
        let decoded = {
            let dst = &mut slot.out.space_mut()[..out_cap];
            match decoder.decompress_frame(frame_payload, dst) {
                Ok(n) => n,
                Err(e) => return Err(fail_slot(writer, slot, e)),
            }
        };
        if let Some(declared) = hint {
            if decoded != declared {
                return Err(fail_slot(writer, slot, Error::FrameDecompress));
            }
        }
        slot.out.set_size(decoded);
        trace!(
            "decompress worker {worker}: frame {} ({payload_len} -> {decoded} bytes)",
            slot.frame
        );

        lock(writer).finish_and_emit(slot, counters)?;
    }
}
