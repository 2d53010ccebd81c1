//! End-to-end round trips across thread counts, levels, and codecs, plus
//! cross-checks against the stock single-threaded zstd decoder.

mod common;

use common::{noise, prose, walk_frames};
use zmt::{
    CompressOptions, DecompressOptions, Lz4Codec, ZstdCodec, compress_stream, decompress_stream,
};

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

fn compress<C: zmt::FrameCodec>(
    input: &[u8],
    threads: usize,
    level: i32,
    chunk_size: usize,
) -> Vec<u8> {
    let mut reader: &[u8] = input;
    let mut out = Vec::new();
    compress_stream::<C, _, _>(
        CompressOptions {
            threads,
            level,
            chunk_size,
        },
        &mut reader,
        &mut out,
    )
    .unwrap();
    out
}

fn decompress<C: zmt::FrameCodec>(stream: &[u8], threads: usize, chunk_size: usize) -> Vec<u8> {
    let mut reader: &[u8] = stream;
    let mut out = Vec::new();
    decompress_stream::<C, _, _>(
        DecompressOptions {
            threads,
            chunk_size,
        },
        &mut reader,
        &mut out,
    )
    .unwrap();
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip matrix
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zstd_round_trip_across_thread_counts_and_levels() {
    let inputs: Vec<(&str, Vec<u8>)> = vec![
        ("empty", Vec::new()),
        ("one byte", vec![0x41]),
        ("prose", prose(900 * KIB + 31)),
        ("noise", noise(700 * KIB + 7, 0xfeed)),
        ("zeros ragged", vec![0u8; MIB + 4097]),
    ];
    for &threads in &[1usize, 2, 4, 16] {
        for &level in &[1i32, 3] {
            for (name, input) in &inputs {
                let stream = compress::<ZstdCodec>(input, threads, level, 256 * KIB);
                let back = decompress::<ZstdCodec>(&stream, threads, 256 * KIB);
                assert_eq!(
                    &back, input,
                    "round trip failed: {name}, threads={threads}, level={level}"
                );
            }
        }
    }
}

#[test]
fn zstd_round_trip_high_level() {
    let input = prose(300 * KIB);
    let stream = compress::<ZstdCodec>(&input, 4, 19, 64 * KIB);
    assert_eq!(decompress::<ZstdCodec>(&stream, 4, 64 * KIB), input);
}

#[test]
fn lz4_round_trip_across_thread_counts() {
    let input = {
        let mut v = prose(MIB);
        v.extend(noise(512 * KIB + 13, 0xabcd));
        v
    };
    for &threads in &[1usize, 4] {
        let stream = compress::<Lz4Codec>(&input, threads, 1, 128 * KIB);
        let back = decompress::<Lz4Codec>(&stream, threads, 128 * KIB);
        assert_eq!(back, input, "lz4 round trip failed at threads={threads}");
    }
}

#[test]
fn lz4_accepts_the_full_level_range() {
    // Levels 1..=15 are all valid for the LZ4 family; the single-speed
    // encoder produces the same bytes at each, so only validation differs.
    let input = prose(64 * KIB);
    let reference = compress::<Lz4Codec>(&input, 2, 1, 16 * KIB);
    for level in [2, 12, 15] {
        assert_eq!(compress::<Lz4Codec>(&input, 2, level, 16 * KIB), reference);
    }
    let err = zmt::CompressionContext::<Lz4Codec>::new(CompressOptions {
        threads: 2,
        level: 16,
        chunk_size: 0,
    })
    .unwrap_err();
    assert_eq!(err.error_name(), "bad_parameter");
}

#[test]
fn mixed_thread_counts_between_compress_and_decompress() {
    let input = prose(2 * MIB + 555);
    let stream = compress::<ZstdCodec>(&input, 16, 3, 128 * KIB);
    assert_eq!(decompress::<ZstdCodec>(&stream, 1, 128 * KIB), input);
    let stream = compress::<ZstdCodec>(&input, 1, 3, 128 * KIB);
    assert_eq!(decompress::<ZstdCodec>(&stream, 16, 128 * KIB), input);
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn output_bytes_do_not_depend_on_thread_count() {
    let input = noise(3 * MIB + 101, 0x1234);
    let reference = compress::<ZstdCodec>(&input, 1, 3, 512 * KIB);
    for &threads in &[2usize, 4, 16] {
        let stream = compress::<ZstdCodec>(&input, threads, 3, 512 * KIB);
        assert_eq!(
            stream, reference,
            "compressed bytes differ at threads={threads}"
        );
    }
}

#[test]
fn repeated_runs_produce_identical_bytes() {
    let input = prose(MIB + 9);
    let first = compress::<ZstdCodec>(&input, 4, 3, 256 * KIB);
    let second = compress::<ZstdCodec>(&input, 4, 3, 256 * KIB);
    assert_eq!(first, second);
}

// ─────────────────────────────────────────────────────────────────────────────
// Stock-decoder compatibility
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stock_zstd_decoder_accepts_the_stream() {
    // The envelopes are valid zstd skippable frames, so a stock streaming
    // decoder walks the whole stream and returns the concatenated payloads.
    let input = prose(MIB + 313);
    let stream = compress::<ZstdCodec>(&input, 4, 3, 256 * KIB);
    assert!(walk_frames(&stream).len() > 1);

    let decoded = zstd::stream::decode_all(&stream[..]).unwrap();
    assert_eq!(decoded, input);
}

#[test]
fn payloads_decode_individually_as_plain_frames() {
    let input = noise(MIB, 0x7777);
    let stream = compress::<ZstdCodec>(&input, 4, 3, 256 * KIB);
    let mut reassembled = Vec::new();
    for frame in walk_frames(&stream) {
        let payload = frame.payload.to_vec();
        reassembled.extend(zstd::stream::decode_all(&payload[..]).unwrap());
    }
    assert_eq!(reassembled, input);
}
