// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use lilith_transcript::engine::segmenter::segment;
use lilith_transcript::engine_core::models::Segment;

fuzz_target!(|data: &str| {
    // Agent output is untrusted. No input may panic the segmenter,
    // and segmenting the same text twice must agree.
    let first = segment(data);
    assert_eq!(first, segment(data));

    // At most one reasoning trace, always in front
    for (i, s) in first.iter().enumerate() {
        if let Segment::ReasoningTrace { .. } = s {
            assert_eq!(i, 0);
        }
    }
});
