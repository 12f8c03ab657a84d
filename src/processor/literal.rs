//! Literal encoding for static text.
//!
//! Text is stored as its UTF-8 bytes written out as `\xHH` escapes. The form
//! only uses `\`, `x` and lower-case hex digits, so it can be dropped into a
//! Rust byte-string literal or a JSON string without any further quoting.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::LiteralError;

/// Static text in its encoded form, e.g. `"A\n"` → `\x41\x0a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedLiteral(String);

impl EncodedLiteral {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<String, LiteralError> {
        decode_literal(self.as_str())
    }
}

pub fn encode_literal(text: &str) -> EncodedLiteral {
    let mut out = String::with_capacity(text.len() * 4);
    for b in text.bytes() {
        // writing into a String cannot fail
        let _ = write!(out, "\\x{b:02x}");
    }
    EncodedLiteral(out)
}

pub fn decode_literal(encoded: &str) -> Result<String, LiteralError> {
    let raw = encoded.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len() / 4);
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'\\' || raw.get(i + 1) != Some(&b'x') {
            return Err(LiteralError::BadEscape(i));
        }
        if i + 4 > raw.len() {
            return Err(LiteralError::Truncated(i));
        }
        let hi = hex_value(raw[i + 2], i + 2)?;
        let lo = hex_value(raw[i + 3], i + 3)?;
        bytes.push(hi << 4 | lo);
        i += 4;
    }
    Ok(String::from_utf8(bytes)?)
}

fn hex_value(b: u8, at: usize) -> Result<u8, LiteralError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(LiteralError::BadHexDigit {
            digit: char::from(b),
            at,
        }),
    }
}
