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

pub mod markers {
    /// Opens a tagged tool invocation block
    pub const TOOL_CALL_OPEN: &str = "[MCP_TOOL_CALL]";
    /// Closes a tagged tool invocation block
    pub const TOOL_CALL_CLOSE: &str = "[/MCP_TOOL_CALL]";
    /// Opens a reasoning trace block
    pub const THOUGHT_OPEN: &str = "[THOUGHT]";
    /// Closes a reasoning trace block
    pub const THOUGHT_CLOSE: &str = "[/THOUGHT]";
    /// Prefix of a directive line that is never displayed
    pub const SYSTEM_DIRECTIVE: &str = "[SYSTEM]";
    /// Prefix of a file attachment header, followed by `<name>]`
    pub const FILE_UPLOAD_PREFIX: &str = "[FILE_UPLOAD:";
    /// Terminates the file attachment header
    pub const FILE_UPLOAD_SUFFIX: &str = "]";
}

pub mod placeholder {
    /// Opens a placeholder token (U+FFF9 INTERLINEAR ANNOTATION ANCHOR)
    pub const TOKEN_START: char = '\u{FFF9}';
    /// Closes a placeholder token (U+FFFB INTERLINEAR ANNOTATION TERMINATOR)
    pub const TOKEN_END: char = '\u{FFFB}';
    /// Separates the per-call nonce from the slot index
    pub const INDEX_SEPARATOR: char = '#';
}

pub mod envelope {
    /// Primary tool name field
    pub const FIELD_TOOL: &str = "tool";
    /// Fallback tool name field
    pub const FIELD_TOOL_NAME: &str = "tool_name";
    pub const FIELD_ARGS: &str = "args";
    pub const FIELD_RESULT: &str = "result";
    /// Protocol-version marker identifying a JSON-RPC envelope
    pub const FIELD_JSONRPC: &str = "jsonrpc";
    pub const FIELD_ERROR: &str = "error";
    pub const FIELD_MESSAGE: &str = "message";
    pub const FIELD_IS_ERROR: &str = "isError";
    pub const FIELD_CONTENT: &str = "content";
    pub const FIELD_TEXT: &str = "text";
    pub const FIELD_STDOUT: &str = "stdout";
    pub const FIELD_STDERR: &str = "stderr";
    /// Short natural-language summary carried by untagged tool JSON
    pub const FIELD_RESPONSE: &str = "response";
    /// Tool name used when the payload names none
    pub const UNKNOWN_TOOL: &str = "unknown_tool";
}

pub mod display {
    /// Shown in place of an empty tool output
    pub const NO_OUTPUT: &str = "(no output)";
    /// Prefix of the one-line citation replacing a file upload block
    pub const ATTACHMENT_CITATION_PREFIX: &str = "📎 Attached file: ";
}

pub mod config {
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
    pub const ENV_MAX_TRANSCRIPT_BYTES: &str = "LILITH_TRANSCRIPT_MAX_BYTES";
    pub const ENV_STRIP_SYSTEM: &str = "LILITH_TRANSCRIPT_STRIP_SYSTEM";
    pub const ENV_COLLAPSE_UPLOADS: &str = "LILITH_TRANSCRIPT_COLLAPSE_UPLOADS";
    pub const ENV_SUPPRESS_INLINE_JSON: &str = "LILITH_TRANSCRIPT_SUPPRESS_INLINE_JSON";
}

pub mod limits {
    /// Maximum accumulated transcript size accepted by the stream codec (16 MB)
    pub const MAX_TRANSCRIPT_BYTES: u64 = 16 * 1024 * 1024;
    /// Longest incomplete UTF-8 sequence carried between decode calls
    pub const MAX_PENDING_UTF8_BYTES: usize = 3;
}
