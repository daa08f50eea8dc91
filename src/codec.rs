//! Path Codec - 12-Bit Packed Geometry Decoder
//!
//! Part bodies pack two 12-bit values into every 3 bytes. Decoding is a
//! one-way, deterministic decompression into the textual path
//! mini-language consumed by the SVG renderer; it is not invertible.
//!
//! Value layout per 3-byte window `[a, b, c]`:
//! - value 0: low byte `a`, high nibble `b % 16`
//! - value 1: low byte `c`, high nibble `b / 16`
//!
//! A zero high nibble marks a command letter (non-letter codes are
//! dropped silently); a nonzero high nibble encodes a signed coordinate
//! delta biased around 1024.

use crate::error::{RegistryError, Result};

const DELTA_BIAS: u16 = 1024;

/// Decode a packed part body into path-drawing text.
///
/// The body must hold whole 3-byte windows and an even number of bytes;
/// an odd or partial-window length fails with `MalformedInput`.
pub fn decode(body: &[u8]) -> Result<String> {
    if body.len() % 2 != 0 {
        return Err(RegistryError::MalformedInput(format!(
            "odd body length {}",
            body.len()
        )));
    }
    if body.len() % 3 != 0 {
        return Err(RegistryError::MalformedInput(format!(
            "body length {} is not a whole number of 3-byte windows",
            body.len()
        )));
    }

    let count = body.len() * 2 / 3;
    let mut out = String::new();

    for i in 0..count {
        let offset = (i / 2) * 3;
        let (low, high) = if i % 2 == 0 {
            (body[offset], body[offset + 1] % 16)
        } else {
            (body[offset + 2], body[offset + 1] / 16)
        };

        if high == 0 {
            if low.is_ascii_alphabetic() {
                out.push(low as char);
            }
            // anything else is dropped, not an error
            continue;
        }

        let value = u16::from(high) * 256 + u16::from(low) - 256;
        if value >= DELTA_BIAS {
            out.push_str(&format!("{} ", value - DELTA_BIAS));
        } else {
            out.push_str(&format!("-{} ", DELTA_BIAS - value));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_command_and_negative_delta() {
        // window 1: 'M' then -1000; window 2: 'L' then a dropped NUL
        let body = [0x4D, 0x10, 0x18, 0x4C, 0x00, 0x00];
        assert_eq!(decode(&body).unwrap(), "M-1000 L");
    }

    #[test]
    fn decodes_positive_delta() {
        // high 8, low 0 -> value 1792 -> +768
        let body = [0x00, 0x08, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(decode(&body).unwrap(), "768 ");
    }

    #[test]
    fn decodes_zero_delta() {
        // high 5, low 0 -> value 1024 -> "0 "
        let body = [0x00, 0x05, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(decode(&body).unwrap(), "0 ");
    }

    #[test]
    fn lowercase_commands_pass_through() {
        let body = [0x6D, 0x00, 0x7A, 0x00, 0x00, 0x00];
        assert_eq!(decode(&body).unwrap(), "mz");
    }

    #[test]
    fn non_letter_codes_are_dropped() {
        // '@' (0x40) and '{' (0x7B) sit just outside both letter ranges
        let body = [0x40, 0x00, 0x7B, 0x58, 0x00, 0x7A];
        assert_eq!(decode(&body).unwrap(), "Xz");
    }

    #[test]
    fn empty_body_decodes_to_empty_string() {
        assert_eq!(decode(&[]).unwrap(), "");
    }

    #[test]
    fn odd_length_is_malformed() {
        let err = decode(&[0x4D, 0x10, 0x18, 0x4C, 0x00]).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedInput(_)));
    }

    #[test]
    fn partial_window_is_malformed() {
        // even, but not a whole number of 3-byte windows
        let err = decode(&[0x4D, 0x10, 0x18, 0x4C]).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedInput(_)));
    }

    #[test]
    fn decoding_is_deterministic() {
        let body = [0x4D, 0x10, 0x18, 0x4C, 0x85, 0x21];
        assert_eq!(decode(&body).unwrap(), decode(&body).unwrap());
    }
}
