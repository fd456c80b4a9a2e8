// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

//! Formal Verification Module (Kani Proofs)
//!
//! Proofs cover the brace scanner over short symbolic inputs drawn from the
//! bytes that drive its state machine. Inputs are ASCII so every symbolic
//! array is a valid `&str`.

#[allow(dead_code)]
const ALPHABET: [u8; 5] = [b'{', b'}', b'"', b'\\', b'a'];

#[cfg(kani)]
mod proofs {
    use super::ALPHABET;
    use crate::engine::inline_json::BraceScanner;

    const N: usize = 5;

    fn symbolic_text() -> [u8; N] {
        let bytes: [u8; N] = kani::any();
        for b in bytes.iter() {
            kani::assume(ALPHABET.contains(b));
        }
        bytes
    }

    // =========================================================================
    // PROOF 1: SPANS ARE BALANCED-DELIMITED AND IN BOUNDS
    // =========================================================================
    #[kani::proof]
    #[kani::unwind(7)]
    fn prove_spans_delimited_by_braces() {
        let bytes = symbolic_text();
        let Ok(text) = std::str::from_utf8(&bytes) else {
            return;
        };
        for span in BraceScanner::new(text) {
            kani::assert(span.start < span.end, "Span must be non-empty");
            kani::assert(span.end <= N, "Span must stay in bounds");
            kani::assert(bytes[span.start] == b'{', "Span must open with a brace");
            kani::assert(bytes[span.end - 1] == b'}', "Span must close with a brace");
        }
    }

    // =========================================================================
    // PROOF 2: SPANS NEVER OVERLAP AND ARRIVE IN ORDER
    // =========================================================================
    #[kani::proof]
    #[kani::unwind(7)]
    fn prove_spans_ordered() {
        let bytes = symbolic_text();
        let Ok(text) = std::str::from_utf8(&bytes) else {
            return;
        };
        let mut prev_end = 0usize;
        for span in BraceScanner::new(text) {
            kani::assert(span.start >= prev_end, "CRITICAL: spans must not overlap");
            prev_end = span.end;
        }
    }

    // =========================================================================
    // PROOF 3: DEPTH NEVER UNDERFLOWS ON STRAY CLOSERS
    // =========================================================================
    #[kani::proof]
    #[kani::unwind(7)]
    fn prove_depth_bounded() {
        let bytes = symbolic_text();
        let Ok(text) = std::str::from_utf8(&bytes) else {
            return;
        };
        let mut scanner = BraceScanner::new(text);
        while scanner.next().is_some() {}
        kani::assert(scanner.depth() <= N, "Depth bounded by input length");
    }
}
