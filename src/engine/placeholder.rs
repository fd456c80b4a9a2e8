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

//! Placeholder protection.
//!
//! Tagged tool-invocation spans are swapped for opaque tokens before the
//! later passes (reasoning extraction, directive stripping, inline JSON
//! scanning) run over the text. Tokens contain no braces, brackets or line
//! breaks, so no pass can consume or corrupt a tagged block. A table lives for
//! exactly one `segment` call.

use std::ops::Range;
use uuid::Uuid;

use crate::engine_core::constants::placeholder::{INDEX_SEPARATOR, TOKEN_END, TOKEN_START};

/// A tagged block lifted out of the working text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldedSpan {
    /// The original span, markers included
    pub tagged: String,
    /// Byte range of the payload inside `tagged`
    pub payload: Range<usize>,
}

impl ShieldedSpan {
    pub fn payload(&self) -> &str {
        &self.tagged[self.payload.clone()]
    }
}

/// A run of working text: literal text or a reference to a shielded span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Slot(usize),
}

#[derive(Debug)]
pub struct PlaceholderTable {
    /// `TOKEN_START` + nonce + `INDEX_SEPARATOR`; shared by every token
    prefix: String,
    spans: Vec<ShieldedSpan>,
}

impl PlaceholderTable {
    #[must_use]
    pub fn new() -> Self {
        let nonce = Uuid::new_v4().simple().to_string();
        Self {
            prefix: format!("{TOKEN_START}{nonce}{INDEX_SEPARATOR}"),
            spans: Vec::new(),
        }
    }

    /// Registers a span and returns the token standing in for it.
    pub fn shield(&mut self, span: ShieldedSpan) -> String {
        let idx = self.spans.len();
        self.spans.push(span);
        self.token(idx)
    }

    pub fn token(&self, idx: usize) -> String {
        format!("{}{}{}", self.prefix, idx, TOKEN_END)
    }

    pub fn get(&self, idx: usize) -> Option<&ShieldedSpan> {
        self.spans.get(idx)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Splits `text` into literal runs and slots, in order. Empty literal runs
    /// are not produced.
    pub fn pieces<'a>(&self, text: &'a str) -> Vec<Piece<'a>> {
        let mut out = Vec::new();
        let mut rest = text;
        let mut cursor = 0usize;

        while let Some(pos) = rest[cursor..].find(&self.prefix) {
            let at = cursor + pos;
            match self.parse_token(&rest[at..]) {
                Some((idx, len)) => {
                    if at > 0 {
                        out.push(Piece::Text(&rest[..at]));
                    }
                    out.push(Piece::Slot(idx));
                    rest = &rest[at + len..];
                    cursor = 0;
                }
                // Prefix look-alike without a valid index: keep it as text
                None => cursor = at + self.prefix.len(),
            }
        }
        if !rest.is_empty() {
            out.push(Piece::Text(rest));
        }
        out
    }

    /// Substitutes every token with its original tagged span, verbatim.
    pub fn restore(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for piece in self.pieces(text) {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Slot(idx) => out.push_str(&self.spans[idx].tagged),
            }
        }
        out
    }

    /// Concatenation of the tokens found in `text`, dropping everything else.
    /// Used when a pass removes a region that may have enclosed tagged blocks.
    pub fn tokens_in(&self, text: &str) -> String {
        let mut out = String::new();
        for piece in self.pieces(text) {
            if let Piece::Slot(idx) = piece {
                out.push_str(&self.token(idx));
            }
        }
        out
    }

    /// `text` with every token removed.
    pub fn strip_tokens(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for piece in self.pieces(text) {
            if let Piece::Text(t) = piece {
                out.push_str(t);
            }
        }
        out
    }

    /// Returns `(index, token_len)` when `s` starts with a complete token.
    fn parse_token(&self, s: &str) -> Option<(usize, usize)> {
        let after = s.strip_prefix(&self.prefix)?;
        let end = after.find(TOKEN_END)?;
        let digits = &after[..end];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let idx: usize = digits.parse().ok()?;
        if idx >= self.spans.len() {
            return None;
        }
        Some((idx, self.prefix.len() + end + TOKEN_END.len_utf8()))
    }
}

impl Default for PlaceholderTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(tagged: &str) -> ShieldedSpan {
        ShieldedSpan {
            tagged: tagged.to_string(),
            payload: 1..tagged.len() - 1,
        }
    }

    #[test]
    fn test_tokens_are_unique_per_table() {
        let mut a = PlaceholderTable::new();
        let mut b = PlaceholderTable::new();
        let ta = a.shield(span("<x>"));
        let tb = b.shield(span("<x>"));
        assert_ne!(ta, tb, "Nonce must differ between tables");
        assert_ne!(a.token(0), a.token(1));
    }

    #[test]
    fn test_tokens_carry_no_scanner_delimiters() {
        let mut table = PlaceholderTable::new();
        let token = table.shield(span("{\"tool\":\"a\"}"));
        assert!(!token.contains(['{', '}', '[', ']', '\n', '"']));
    }

    #[test]
    fn test_restore_is_verbatim() {
        let mut table = PlaceholderTable::new();
        let t0 = table.shield(span("<first>"));
        let t1 = table.shield(span("<second>"));
        let text = format!("a {t0} b {t1}{t0} c");
        assert_eq!(table.restore(&text), "a <first> b <second><first> c");
    }

    #[test]
    fn test_pieces_order() {
        let mut table = PlaceholderTable::new();
        let t0 = table.shield(span("<x>"));
        let text = format!("{t0}mid{t0}");
        assert_eq!(
            table.pieces(&text),
            vec![Piece::Slot(0), Piece::Text("mid"), Piece::Slot(0)]
        );
    }

    #[test]
    fn test_forged_prefix_stays_text() {
        let mut table = PlaceholderTable::new();
        let _ = table.shield(span("<x>"));
        let forged = format!("{}99{}", table.prefix, TOKEN_END);
        assert_eq!(table.pieces(&forged), vec![Piece::Text(&forged)]);
        assert_eq!(table.restore(&forged), forged);
    }

    #[test]
    fn test_tokens_in_and_strip() {
        let mut table = PlaceholderTable::new();
        let t0 = table.shield(span("<x>"));
        let text = format!("[SYSTEM] note {t0} tail");
        assert_eq!(table.tokens_in(&text), t0);
        assert_eq!(table.strip_tokens(&text), "[SYSTEM] note  tail");
    }
}
