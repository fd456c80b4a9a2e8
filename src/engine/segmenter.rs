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

//! Transcript Segmenter.
//!
//! Splits the accumulated text of one agent turn into plain text, a single
//! aggregated reasoning trace and tagged tool invocations. Pure and
//! stateless: the caller re-runs it on the whole text every time a chunk
//! arrives, and partial input is always tolerated.
//!
//! Passes, in order:
//! 1. tagged tool blocks are lifted into a `PlaceholderTable` (an
//!    unterminated block holds back the tail of the text),
//! 2. reasoning blocks are cut out and aggregated,
//! 3. `[SYSTEM]` directive lines are dropped,
//! 4. file upload blocks are collapsed to a citation,
//! 5. the first untagged inline tool JSON is suppressed,
//! 6. the working text is split back into segments at the placeholders.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::engine::directives::{collapse_file_uploads, strip_system_directives};
use crate::engine::inline_json::suppress_inline_tool_call;
use crate::engine::placeholder::{Piece, PlaceholderTable, ShieldedSpan};
use crate::engine_core::constants::markers;
use crate::engine_core::models::Segment;
use crate::engine_core::types::RawPayload;

/// Toggles for the optional clean-up passes. Tool and reasoning extraction
/// always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterOptions {
    pub strip_system_directives: bool,
    pub collapse_file_uploads: bool,
    pub suppress_inline_tool_json: bool,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            strip_system_directives: true,
            collapse_file_uploads: true,
            suppress_inline_tool_json: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    options: SegmenterOptions,
}

impl Segmenter {
    #[must_use]
    pub fn new(options: SegmenterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    /// Segments a transcript snapshot.
    ///
    /// The `ReasoningTrace`, when present, is always the first element; the
    /// remaining segments follow transcript order.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let mut table = PlaceholderTable::new();

        let working = shield_tool_blocks(text, &mut table);
        let (mut working, reasoning) = extract_reasoning(&working, &table);

        if self.options.strip_system_directives {
            working = strip_system_directives(&working, &table);
        }
        if self.options.collapse_file_uploads {
            working = collapse_file_uploads(&working, &table);
        }
        if self.options.suppress_inline_tool_json {
            working = suppress_inline_tool_call(&working, &table);
        }

        let mut segments = Vec::with_capacity(2 * table.len() + 2);
        if !reasoning.is_empty() {
            segments.push(Segment::reasoning(reasoning));
        }
        emit_segments(&working, &table, &mut segments);

        trace!(
            "Segmented {} bytes into {} segments ({} tagged blocks)",
            text.len(),
            segments.len(),
            table.len()
        );
        segments
    }
}

/// Segments `text` with every clean-up pass enabled.
pub fn segment(text: &str) -> Vec<Segment> {
    Segmenter::default().segment(text)
}

/// Replaces each complete tool block with a placeholder token. Text from an
/// unterminated opener onward is dropped until its closer arrives.
fn shield_tool_blocks(text: &str, table: &mut PlaceholderTable) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(markers::TOOL_CALL_OPEN) {
        out.push_str(&rest[..open]);
        let body_start = open + markers::TOOL_CALL_OPEN.len();
        let Some(close_rel) = rest[body_start..].find(markers::TOOL_CALL_CLOSE) else {
            trace!("Holding back unterminated tool block at byte {}", open);
            return out;
        };
        let close = body_start + close_rel;
        let end = close + markers::TOOL_CALL_CLOSE.len();

        let token = table.shield(ShieldedSpan {
            tagged: rest[open..end].to_string(),
            payload: markers::TOOL_CALL_OPEN.len()..close - open,
        });
        out.push_str(&token);
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Cuts every reasoning block out of `text`. Returns the remaining text and
/// the trimmed block contents joined by blank lines. An unterminated opener
/// runs to the end of the text.
fn extract_reasoning(text: &str, table: &PlaceholderTable) -> (String, String) {
    let mut kept = String::with_capacity(text.len());
    let mut thoughts: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(markers::THOUGHT_OPEN) {
        kept.push_str(&rest[..open]);
        let body_start = open + markers::THOUGHT_OPEN.len();
        let (inner, next) = match rest[body_start..].find(markers::THOUGHT_CLOSE) {
            Some(rel) => (
                &rest[body_start..body_start + rel],
                &rest[body_start + rel + markers::THOUGHT_CLOSE.len()..],
            ),
            None => (&rest[body_start..], ""),
        };

        // Tagged blocks stay in place; they are not part of the reasoning
        kept.push_str(&table.tokens_in(inner));
        let content = table.strip_tokens(inner);
        let content = content.trim();
        if !content.is_empty() {
            thoughts.push(content.to_string());
        }
        rest = next;
    }

    kept.push_str(rest);
    (kept, thoughts.join("\n\n"))
}

/// Splits the working text at placeholders. Blocks whose payload is not
/// well-formed JSON are omitted and the text around them merges.
fn emit_segments(working: &str, table: &PlaceholderTable, segments: &mut Vec<Segment>) {
    let mut pending = String::new();

    for piece in table.pieces(working) {
        match piece {
            Piece::Text(text) => pending.push_str(text),
            Piece::Slot(idx) => {
                let Some(span) = table.get(idx) else {
                    continue;
                };
                let raw_payload = RawPayload::new(span.payload());
                if !raw_payload.is_well_formed() {
                    debug!("Omitting tool block #{} with malformed payload", idx);
                    continue;
                }
                if !pending.is_empty() {
                    segments.push(Segment::plain(std::mem::take(&mut pending)));
                }
                segments.push(Segment::ToolInvocation { raw_payload });
            }
        }
    }

    if !pending.is_empty() {
        segments.push(Segment::plain(pending));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shield_holds_back_unterminated_block() {
        let mut table = PlaceholderTable::new();
        let out = shield_tool_blocks("a [MCP_TOOL_CALL]{} b [MCP_TOOL_CALL]{\"to", &mut table);
        assert_eq!(table.len(), 0);
        assert_eq!(out, "a ");
    }

    #[test]
    fn test_shield_restores_verbatim() {
        let text = "x [MCP_TOOL_CALL] {\"tool\":\"a\"} [/MCP_TOOL_CALL] y [/MCP_TOOL_CALL]";
        let mut table = PlaceholderTable::new();
        let shielded = shield_tool_blocks(text, &mut table);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().payload(), " {\"tool\":\"a\"} ");
        assert_eq!(table.restore(&shielded), text);
    }

    #[test]
    fn test_reasoning_blocks_join_with_blank_line() {
        let table = PlaceholderTable::new();
        let (kept, reasoning) =
            extract_reasoning("A[THOUGHT] one [/THOUGHT]B[THOUGHT]two[/THOUGHT]C", &table);
        assert_eq!(kept, "ABC");
        assert_eq!(reasoning, "one\n\ntwo");
    }

    #[test]
    fn test_empty_reasoning_is_skipped() {
        let table = PlaceholderTable::new();
        let (kept, reasoning) = extract_reasoning("A[THOUGHT]  [/THOUGHT]B[THOUGHT]", &table);
        assert_eq!(kept, "AB");
        assert!(reasoning.is_empty());
    }

    #[test]
    fn test_tool_block_inside_reasoning_stays_positional() {
        let segments = segment(
            "[THOUGHT]plan [MCP_TOOL_CALL]{\"tool\":\"a\"}[/MCP_TOOL_CALL] more[/THOUGHT]done",
        );
        assert_eq!(
            segments,
            vec![
                Segment::reasoning("plan  more"),
                Segment::tool("{\"tool\":\"a\"}"),
                Segment::plain("done"),
            ]
        );
    }

    #[test]
    fn test_options_disable_cleanup_passes() {
        let segmenter = Segmenter::new(SegmenterOptions {
            strip_system_directives: false,
            collapse_file_uploads: false,
            suppress_inline_tool_json: false,
        });
        let text = "[SYSTEM] x\n[FILE_UPLOAD: a]\nb\n{\"tool\":\"c\"}";
        assert_eq!(segmenter.segment(text), vec![Segment::plain(text)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
    }
}
