#![no_main]
use libfuzzer_sys::fuzz_target;

use zmt::envelope::{parse_header, ENVELOPE_SIZE};
use zmt::{decompress_stream, DecompressOptions, Lz4Codec, ZstdCodec};

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through the envelope parser and both decompression
    // engines.  Err results are expected and fine; what we verify is no
    // panics, no hangs, and no unbounded allocation.

    if data.len() >= ENVELOPE_SIZE {
        let _ = parse_header(data, 0x184D_2A50);
        let _ = parse_header(data, 0xdead_beef);
    }

    // A small ceiling keeps length-field lies cheap: anything the stream
    // declares beyond compress_bound(ceiling) must be rejected, not allocated.
    let opts = DecompressOptions {
        threads: 2,
        chunk_size: 64 * 1024,
    };

    {
        let mut reader: &[u8] = data;
        let mut out = Vec::new();
        let _ = decompress_stream::<ZstdCodec, _, _>(opts, &mut reader, &mut out);
    }

    {
        let mut reader: &[u8] = data;
        let mut out = Vec::new();
        let _ = decompress_stream::<Lz4Codec, _, _>(opts, &mut reader, &mut out);
    }
});
