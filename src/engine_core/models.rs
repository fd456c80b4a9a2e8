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

//! Domain models for lilith-transcript.
//!
//! Pure data structures produced by the segmenter and the envelope resolver.
//! Nothing here performs I/O or holds state between parser invocations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine_core::types::RawPayload;

/// A classified span of an agent transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Segment {
    /// Narrative content, rendered as formatted text
    PlainText { text: String },
    /// Every reasoning block seen so far, joined by blank lines
    ReasoningTrace { text: String },
    /// A tagged tool call; the payload is parsed later by the envelope resolver
    ToolInvocation { raw_payload: RawPayload },
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::ReasoningTrace { text: text.into() }
    }

    pub fn tool(raw_payload: impl Into<String>) -> Self {
        Self::ToolInvocation {
            raw_payload: RawPayload::new(raw_payload),
        }
    }

    /// Text carried by a plain or reasoning segment
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::PlainText { text } | Self::ReasoningTrace { text } => Some(text),
            Self::ToolInvocation { .. } => None,
        }
    }

    pub fn raw_payload(&self) -> Option<&RawPayload> {
        match self {
            Self::ToolInvocation { raw_payload } => Some(raw_payload),
            _ => None,
        }
    }

    pub fn is_reasoning(&self) -> bool {
        matches!(self, Self::ReasoningTrace { .. })
    }
}

/// Success/error verdict and the text to surface for one tool result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResult {
    pub is_error: bool,
    /// May be empty; the view layer substitutes a placeholder
    pub display_text: String,
}

impl ResolvedResult {
    pub fn success(display_text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            display_text: display_text.into(),
        }
    }

    pub fn error(display_text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            display_text: display_text.into(),
        }
    }
}

/// Parsed form of a tagged tool invocation payload.
///
/// Built fresh on every render pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRecord {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
    /// The `result` field exactly as emitted, before unwrapping
    pub result_envelope: Value,
    pub outcome: ResolvedResult,
}
