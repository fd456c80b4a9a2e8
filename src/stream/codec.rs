// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Transcript Stream Codec.
//!
//! Accumulates raw bytes from a streaming transport into the transcript text
//! and yields a fresh segmentation snapshot whenever new text arrives. Chunk
//! boundaries may split a UTF-8 code point; the incomplete tail is carried to
//! the next call instead of being mangled.

use crate::engine::segmenter::Segmenter;
use crate::engine_core::constants::limits;
use crate::engine_core::errors::TranscriptError;
use crate::engine_core::models::Segment;
use anyhow::Result;
use bytes::{Buf, BytesMut};
use serde::{Deserialize, Serialize};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

/// Segmentation of everything received so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    pub segments: Vec<Segment>,
    /// Raw bytes consumed from the stream, pending partial code points excluded
    pub bytes_seen: u64,
}

pub struct TranscriptCodec {
    segmenter: Segmenter,
    transcript: String,
    bytes_seen: u64,
    max_bytes: u64,
}

impl TranscriptCodec {
    #[must_use]
    pub fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            transcript: String::new(),
            bytes_seen: 0,
            max_bytes: limits::MAX_TRANSCRIPT_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// The text accumulated so far
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            segments: self.segmenter.segment(&self.transcript),
            bytes_seen: self.bytes_seen,
        }
    }

    /// Moves decodable bytes from `src` into the transcript. Returns whether
    /// anything was consumed.
    fn absorb(&mut self, src: &mut BytesMut, eof: bool) -> Result<bool> {
        let projected = (self.transcript.len() + src.len()) as u64;
        if projected > self.max_bytes {
            return Err(TranscriptError::TranscriptTooLarge {
                len: projected,
                limit: self.max_bytes,
            }
            .into());
        }

        let (text, consumed) = decode_utf8_prefix(&src[..], eof);
        if consumed == 0 {
            return Ok(false);
        }
        src.advance(consumed);
        self.transcript.push_str(&text);
        self.bytes_seen += consumed as u64;
        trace!(
            "Absorbed {} bytes, transcript now {} bytes",
            consumed,
            self.transcript.len()
        );
        Ok(true)
    }
}

impl Default for TranscriptCodec {
    fn default() -> Self {
        Self::new(Segmenter::default())
    }
}

impl Decoder for TranscriptCodec {
    type Item = TranscriptSnapshot;
    type Error = anyhow::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.is_empty() || !self.absorb(src, false)? {
            return Ok(None);
        }
        Ok(Some(self.snapshot()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.is_empty() {
            return Ok(None);
        }
        debug!("Flushing {} trailing bytes at end of stream", src.len());
        if !self.absorb(src, true)? {
            return Ok(None);
        }
        Ok(Some(self.snapshot()))
    }
}

/// Longest decodable prefix of `bytes` as text, plus the number of bytes it
/// covers. Invalid sequences become U+FFFD. An incomplete code point at the
/// end is left unconsumed unless `eof` is set.
pub fn decode_utf8_prefix(bytes: &[u8], eof: bool) -> (String, usize) {
    let mut out = String::with_capacity(bytes.len());
    let mut consumed = 0usize;

    while consumed < bytes.len() {
        match std::str::from_utf8(&bytes[consumed..]) {
            Ok(s) => {
                out.push_str(s);
                consumed = bytes.len();
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(
                    &bytes[consumed..consumed + valid],
                ));
                consumed += valid;
                match e.error_len() {
                    Some(bad) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        consumed += bad;
                    }
                    None if eof => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        consumed = bytes.len();
                    }
                    None => {
                        debug_assert!(bytes.len() - consumed <= limits::MAX_PENDING_UTF8_BYTES);
                        break;
                    }
                }
            }
        }
    }
    (out, consumed)
}
