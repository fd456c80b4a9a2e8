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

//! Stateless view layer.
//!
//! Maps segments to view models a front end can draw directly: prose, a
//! collapsible reasoning panel and collapsible tool cards. Collapse flags are
//! initial defaults only; expand/collapse state belongs to the front end.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine_core::constants::display;
use crate::engine_core::models::Segment;
use crate::protocol::envelope::resolve;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SegmentView {
    Prose {
        markdown: String,
    },
    Reasoning {
        text: String,
        collapsed: bool,
    },
    ToolCard {
        tool_name: String,
        arguments: Map<String, Value>,
        is_error: bool,
        output: String,
        /// Failed calls start expanded
        collapsed: bool,
    },
}

/// View for a single segment. Whitespace-only prose and tool blocks the
/// resolver rejects have no view.
pub fn view(segment: &Segment) -> Option<SegmentView> {
    match segment {
        Segment::PlainText { text } if text.trim().is_empty() => None,
        Segment::PlainText { text } => Some(SegmentView::Prose {
            markdown: text.clone(),
        }),
        Segment::ReasoningTrace { text } => Some(SegmentView::Reasoning {
            text: text.clone(),
            collapsed: true,
        }),
        Segment::ToolInvocation { raw_payload } => {
            let record = resolve(raw_payload.as_str())?;
            let output = if record.outcome.display_text.trim().is_empty() {
                display::NO_OUTPUT.to_string()
            } else {
                record.outcome.display_text
            };
            Some(SegmentView::ToolCard {
                tool_name: record.tool_name,
                arguments: record.arguments,
                is_error: record.outcome.is_error,
                output,
                collapsed: !record.outcome.is_error,
            })
        }
    }
}

pub fn render(segments: &[Segment]) -> Vec<SegmentView> {
    segments.iter().filter_map(view).collect()
}
