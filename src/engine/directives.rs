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

//! Line-oriented control markers: hidden `[SYSTEM]` directives and
//! `[FILE_UPLOAD: name]` attachment blocks.
//!
//! Both passes run on placeholder-shielded text; any token on a removed line
//! is carried over so tagged tool blocks are never lost.

use crate::engine::placeholder::PlaceholderTable;
use crate::engine_core::constants::{display, markers};

fn line_content(line: &str) -> &str {
    line.trim_start_matches([' ', '\t'])
}

/// Drops every line whose content begins with `[SYSTEM]`, terminator included.
pub fn strip_system_directives(text: &str, table: &PlaceholderTable) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line_content(line).starts_with(markers::SYSTEM_DIRECTIVE) {
            out.push_str(&table.tokens_in(line));
        } else {
            out.push_str(line);
        }
    }
    out
}

/// File name of an attachment header line, if `line` is one.
pub fn upload_header_name(line: &str) -> Option<&str> {
    let rest = line_content(line).strip_prefix(markers::FILE_UPLOAD_PREFIX)?;
    let end = rest.find(markers::FILE_UPLOAD_SUFFIX)?;
    let name = rest[..end].trim();
    (!name.is_empty()).then_some(name)
}

/// Collapses each attachment block (header plus body up to the next blank line
/// or end of text) into a one-line citation naming the file.
pub fn collapse_file_uploads(text: &str, table: &PlaceholderTable) -> String {
    let mut out = String::with_capacity(text.len());
    // Inside a block: whether the last consumed line ended with a newline
    let mut open_block: Option<bool> = None;

    for line in text.split_inclusive('\n') {
        // Tagged blocks in the header are kept as tokens, never as the name
        let header = upload_header_name(line)
            .map(|name| table.strip_tokens(name).trim().to_string())
            .filter(|name| !name.is_empty());
        if let Some(name) = header {
            if let Some(true) = open_block {
                out.push('\n');
            }
            out.push_str(display::ATTACHMENT_CITATION_PREFIX);
            out.push_str(&name);
            out.push_str(&table.tokens_in(line));
            open_block = Some(line.ends_with('\n'));
            continue;
        }

        match open_block {
            Some(_) if line.trim().is_empty() => {
                out.push('\n');
                out.push_str(line);
                open_block = None;
            }
            Some(_) => {
                out.push_str(&table.tokens_in(line));
                open_block = Some(line.ends_with('\n'));
            }
            None => out.push_str(line),
        }
    }

    if let Some(true) = open_block {
        out.push('\n');
    }
    out
}
