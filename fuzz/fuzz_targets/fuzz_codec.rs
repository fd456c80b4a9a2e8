// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use lilith_transcript::stream::codec::TranscriptCodec;
use tokio_util::codec::Decoder;

#[derive(Debug, Arbitrary)]
struct ChunkedInput {
    chunks: Vec<Vec<u8>>,
}

fuzz_target!(|data: &[u8]| {
    // Chunks may split anywhere, including inside a code point or a marker.
    // Errors are fine, panics are not.
    let mut unstructured = Unstructured::new(data);
    let Ok(input) = ChunkedInput::arbitrary(&mut unstructured) else {
        return;
    };

    let mut codec = TranscriptCodec::default().with_max_bytes(1 << 20);
    let mut src = BytesMut::new();
    for chunk in &input.chunks {
        src.extend_from_slice(chunk);
        if codec.decode(&mut src).is_err() {
            return;
        }
    }
    let _ = codec.decode_eof(&mut src);
});
