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

//! Error types for lilith-transcript.
//!
//! Parsing never surfaces these to callers of `segment` or `resolve`; they
//! exist for the fallible building blocks underneath and for the edges
//! (configuration, stream decoding, I/O).

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranscriptError {
    /// A tagged tool payload is not well-formed JSON
    #[error("Malformed tool payload: {0}")]
    PayloadParse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The accumulated transcript grew past the configured limit
    #[error("Transcript length {len} exceeds max limit {limit}")]
    TranscriptTooLarge { len: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
