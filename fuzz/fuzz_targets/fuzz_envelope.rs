// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use lilith_transcript::protocol::envelope::{resolve, unwrap_envelope};

fuzz_target!(|data: &[u8]| {
    // Whatever shape the server sent back, resolution must fall through
    // to some display text without crashing.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = resolve(text);
    }

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = unwrap_envelope(&value);
    }
});
