#![no_main]
use libfuzzer_sys::fuzz_target;

use zmt::{
    compress_stream, decompress_stream, CompressOptions, DecompressOptions, ZstdCodec,
};

fuzz_target!(|data: &[u8]| {
    // Tiny chunks force multi-frame streams even for small fuzzer inputs, so
    // the slot pool, frame ordering, and envelope framing all get exercised.
    const CHUNK: usize = 4 * 1024;

    let mut reader: &[u8] = data;
    let mut compressed = Vec::new();
    compress_stream::<ZstdCodec, _, _>(
        CompressOptions {
            threads: 2,
            level: 1,
            chunk_size: CHUNK,
        },
        &mut reader,
        &mut compressed,
    )
    .expect("compressing fuzzer input must succeed");

    let mut packed: &[u8] = &compressed;
    let mut recovered = Vec::new();
    decompress_stream::<ZstdCodec, _, _>(
        DecompressOptions {
            threads: 2,
            chunk_size: CHUNK,
        },
        &mut packed,
        &mut recovered,
    )
    .expect("decompressing self-compressed data must succeed");

    assert_eq!(
        recovered,
        data,
        "round-trip mismatch: {} bytes in, {} bytes back",
        data.len(),
        recovered.len()
    );
});
