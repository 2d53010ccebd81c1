//! Shared fixtures for the integration suites: deterministic corpora and an
//! envelope walker for inspecting compressed streams.

#![allow(dead_code)] // each test crate uses its own subset

use zmt::envelope::{read_le32, ENVELOPE_SIZE};

/// Deterministic pseudo-random bytes (xorshift64*); poorly compressible.
pub fn noise(len: usize, mut seed: u64) -> Vec<u8> {
    assert!(seed != 0);
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let word = seed.wrapping_mul(0x2545_F491_4F6C_DD1D);
        out.extend_from_slice(&word.to_le_bytes());
    }
    out.truncate(len);
    out
}

/// Highly compressible text-like bytes.
pub fn prose(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog 0123456789 "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

/// One parsed envelope + payload from a compressed stream.
pub struct Frame<'a> {
    pub magic: u32,
    pub size_field: u32,
    pub payload: &'a [u8],
}

/// Split a compressed stream into its enveloped frames, panicking on any
/// structural violation — tests lean on this to assert envelope validity.
pub fn walk_frames(stream: &[u8]) -> Vec<Frame<'_>> {
    let mut frames = Vec::new();
    let mut pos = 0;
    while pos < stream.len() {
        assert!(
            pos + ENVELOPE_SIZE <= stream.len(),
            "truncated envelope at offset {pos}"
        );
        let magic = read_le32(stream, pos);
        let size_field = read_le32(stream, pos + 4);
        let payload_len = read_le32(stream, pos + 8) as usize;
        let start = pos + ENVELOPE_SIZE;
        assert!(
            start + payload_len <= stream.len(),
            "payload of frame at {pos} runs past the stream"
        );
        frames.push(Frame {
            magic,
            size_field,
            payload: &stream[start..start + payload_len],
        });
        pos = start + payload_len;
    }
    frames
}
