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

//! Untagged inline tool JSON.
//!
//! Models sometimes print a tool call as bare JSON instead of wrapping it in
//! the tool-call markers. `BraceScanner` finds balanced `{...}` spans in a
//! single linear pass; the first span that parses as an object naming a tool
//! is removed from display, keeping its `response` summary if it has one.

use serde_json::Value;
use std::ops::Range;
use tracing::{debug, trace};

use crate::engine::placeholder::PlaceholderTable;
use crate::engine_core::constants::envelope;
use crate::protocol::envelope::tool_name_of;

// Scanner state. String literals are only tracked inside an object so that
// quotes in prose cannot hide a brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Prose,
    Object { depth: usize, start: usize },
    Str { depth: usize, start: usize, escaped: bool },
}

/// Iterator over the byte ranges of top-level balanced brace spans.
///
/// A `}` with no open brace is ignored; a span still open at end of input is
/// not reported.
pub struct BraceScanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    state: ScanState,
}

impl<'a> BraceScanner<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
            state: ScanState::Prose,
        }
    }

    /// Current nesting depth (0 outside any span).
    pub fn depth(&self) -> usize {
        match self.state {
            ScanState::Prose => 0,
            ScanState::Object { depth, .. } | ScanState::Str { depth, .. } => depth,
        }
    }
}

impl Iterator for BraceScanner<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            let at = self.pos;
            self.pos += 1;

            self.state = match self.state {
                ScanState::Prose => match b {
                    b'{' => ScanState::Object { depth: 1, start: at },
                    _ => ScanState::Prose,
                },
                ScanState::Object { depth, start } => match b {
                    b'{' => ScanState::Object {
                        depth: depth + 1,
                        start,
                    },
                    b'}' if depth == 1 => {
                        self.state = ScanState::Prose;
                        return Some(start..self.pos);
                    }
                    b'}' => ScanState::Object {
                        depth: depth - 1,
                        start,
                    },
                    b'"' => ScanState::Str {
                        depth,
                        start,
                        escaped: false,
                    },
                    _ => ScanState::Object { depth, start },
                },
                ScanState::Str {
                    depth,
                    start,
                    escaped,
                } => match b {
                    _ if escaped => ScanState::Str {
                        depth,
                        start,
                        escaped: false,
                    },
                    b'\\' => ScanState::Str {
                        depth,
                        start,
                        escaped: true,
                    },
                    b'"' => ScanState::Object { depth, start },
                    _ => ScanState::Str {
                        depth,
                        start,
                        escaped: false,
                    },
                },
            };
        }
        None
    }
}

/// An untagged tool call found in plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineToolCall {
    /// Byte range of the JSON object in the scanned text
    pub span: Range<usize>,
    pub tool_name: String,
    /// Non-blank `response` summary, trimmed
    pub response: Option<String>,
}

/// First balanced span that parses as an object with a tool name.
pub fn find_inline_tool_call(text: &str) -> Option<InlineToolCall> {
    for span in BraceScanner::new(text) {
        let candidate = &text[span.clone()];
        let map = match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => map,
            Ok(_) => continue,
            Err(e) => {
                trace!("Brace span at {:?} is not JSON: {}", span, e);
                continue;
            }
        };
        let Some(tool_name) = tool_name_of(&map).filter(|name| !name.is_empty()) else {
            continue;
        };
        let response = map
            .get(envelope::FIELD_RESPONSE)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        debug!("Found untagged tool call '{}' at {:?}", tool_name, span);
        return Some(InlineToolCall {
            span,
            tool_name: tool_name.to_string(),
            response,
        });
    }
    None
}

/// Removes the first untagged tool call from `text`.
///
/// Placeholder tokens inside the removed span are kept at its position. If
/// the call carried a `response` summary, that text is prepended to what
/// remains. Text without a candidate is returned unchanged.
pub fn suppress_inline_tool_call(text: &str, table: &PlaceholderTable) -> String {
    let Some(call) = find_inline_tool_call(text) else {
        return text.to_string();
    };

    let mut remaining = String::with_capacity(text.len());
    remaining.push_str(&text[..call.span.start]);
    remaining.push_str(&table.tokens_in(&text[call.span.clone()]));
    remaining.push_str(&text[call.span.end..]);

    match call.response {
        Some(response) if remaining.trim().is_empty() => response,
        Some(response) => format!("{response}\n\n{remaining}"),
        None => remaining,
    }
}
