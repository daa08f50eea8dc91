//! Validation Capability - Charset Policy
//!
//! The registry never hardcodes a character policy; it invokes whatever
//! validator the caller plugs in. `CharsetValidator` is the stock policy:
//! a printable whitelist safe for embedding into SVG and JSON payloads.

/// Pluggable string-validation capability.
///
/// `validate` gates every name and color accepted by the registry.
/// `sanitize_for_embedding` prepares arbitrary text for inclusion in a
/// quoted attribute of a structured payload: backslash and double-quote
/// are escaped, bytes below 0x20 are stripped.
pub trait Validator {
    fn validate(&self, input: &[u8]) -> bool;

    fn sanitize_for_embedding(&self, input: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(input.len());
        for &b in input.as_bytes() {
            match b {
                b'\\' | b'"' => {
                    out.push(b'\\');
                    out.push(b);
                }
                0x00..=0x1F => {}
                _ => out.push(b),
            }
        }
        out
    }
}

/// Stock validator: digits, ASCII letters, space, `#`, `(`, `)`, `,`,
/// `-`, `.` and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharsetValidator;

impl Validator for CharsetValidator {
    fn validate(&self, input: &[u8]) -> bool {
        input.iter().all(|&b| {
            matches!(b,
                b'0'..=b'9'
                | b'A'..=b'Z'
                | b'a'..=b'z'
                | b' ' | b'#' | b'(' | b')' | b',' | b'-' | b'.')
        })
    }
}
