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

//! Envelope Resolver.
//!
//! Turns the raw payload of a tagged tool invocation into a
//! `ToolInvocationRecord`, unwrapping up to two levels of result envelope
//! (tool result, optionally wrapped in a JSON-RPC response) to decide
//! success/error and which text to surface.

use serde_json::{Map, Value};
use tracing::debug;

use crate::engine_core::constants::envelope as field;
use crate::engine_core::errors::TranscriptError;
use crate::engine_core::models::{ResolvedResult, ToolInvocationRecord};

/// Parses a raw payload. Returns `None` when it is not well-formed JSON; the
/// caller renders nothing for such a block.
pub fn resolve(raw_payload: &str) -> Option<ToolInvocationRecord> {
    match ToolInvocationRecord::from_payload(raw_payload) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("Dropping tool invocation block: {}", e);
            None
        }
    }
}

impl ToolInvocationRecord {
    pub fn from_payload(raw_payload: &str) -> Result<Self, TranscriptError> {
        let payload: Value = serde_json::from_str(raw_payload)?;
        Ok(Self::from_value(&payload))
    }

    /// Builds a record from an already parsed payload. Missing or mistyped
    /// fields fall back to their defaults.
    pub fn from_value(payload: &Value) -> Self {
        let empty = Map::new();
        let obj = payload.as_object().unwrap_or(&empty);

        let tool_name = tool_name_of(obj).unwrap_or(field::UNKNOWN_TOOL).to_string();
        let arguments = obj
            .get(field::FIELD_ARGS)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let result_envelope = obj
            .get(field::FIELD_RESULT)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let outcome = unwrap_envelope(&result_envelope);

        Self {
            tool_name,
            arguments,
            result_envelope,
            outcome,
        }
    }
}

/// `tool`, falling back to `tool_name`. Non-string values count as absent.
pub fn tool_name_of(obj: &Map<String, Value>) -> Option<&str> {
    obj.get(field::FIELD_TOOL)
        .and_then(Value::as_str)
        .or_else(|| obj.get(field::FIELD_TOOL_NAME).and_then(Value::as_str))
}

/// Decides success/error for a `result` envelope and extracts its text.
pub fn unwrap_envelope(result: &Value) -> ResolvedResult {
    let is_rpc = result.get(field::FIELD_JSONRPC).is_some();

    // JSON-RPC error: the inner result, if any, is discarded
    if is_rpc {
        if let Some(error) = result.get(field::FIELD_ERROR).filter(|e| !e.is_null()) {
            let message = match error.get(field::FIELD_MESSAGE) {
                Some(message) => value_text(message),
                None => error.to_string(),
            };
            return ResolvedResult::error(message);
        }
    }

    let (effective, is_error) = match result.get(field::FIELD_RESULT) {
        Some(inner) if is_rpc => (inner, inner.get(field::FIELD_IS_ERROR).is_some_and(is_truthy)),
        _ if !is_rpc => (result, result.get(field::FIELD_IS_ERROR).is_some_and(is_truthy)),
        _ => (result, false),
    };

    ResolvedResult {
        is_error,
        display_text: display_text(effective),
    }
}

/// Text to show for an unwrapped result, first matching rule wins.
pub fn display_text(effective: &Value) -> String {
    if let Value::String(s) = effective {
        return s.clone();
    }

    if let Some(items) = effective.get(field::FIELD_CONTENT).and_then(Value::as_array) {
        return items
            .iter()
            .map(|item| match item.get(field::FIELD_TEXT) {
                Some(text) => value_text(text),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    let stdout = effective.get(field::FIELD_STDOUT);
    let stderr = effective.get(field::FIELD_STDERR);
    if stdout.is_some() || stderr.is_some() {
        return [stdout, stderr]
            .into_iter()
            .flatten()
            .map(value_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }

    if let Some(message) = effective.get(field::FIELD_MESSAGE) {
        return value_text(message);
    }

    match effective {
        Value::Null => String::new(),
        Value::Object(map) if map.is_empty() => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Strings verbatim, null as empty, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
