//! Decoding of raw string token content
//!
//! The tokenizer keeps string bodies exactly as written (escapes and hex
//! digits included). These functions turn them into the bytes they denote,
//! following ISO 32000-1 Section 7.3.4.

use crate::buffer::ByteBuffer;

/// Decode the raw content of a string token.
///
/// `hex` selects hex (`<...>`) or literal (`(...)`) decoding.
pub fn decode_string_content(content: &[u8], hex: bool) -> Vec<u8> {
    if hex {
        decode_hex(content)
    } else {
        decode_literal(content)
    }
}

/// Hex digit pairs to bytes; a lone trailing digit becomes the high nibble
fn decode_hex(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() / 2 + 1);
    let mut digits = content
        .iter()
        .take_while(|&&b| b != b'>')
        .filter_map(|&b| ByteBuffer::hex_value(b));

    while let Some(high) = digits.next() {
        let low = digits.next().unwrap_or(0);
        out.push(high << 4 | low);
    }
    out
}

fn decode_literal(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut i = 0;

    while i < content.len() {
        let ch = content[i];
        i += 1;

        match ch {
            b'\\' => {
                let Some(&escaped) = content.get(i) else {
                    break;
                };
                i += 1;
                match escaped {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' => out.push(0x08),
                    b'f' => out.push(0x0c),
                    // line continuation
                    b'\r' => {
                        if content.get(i) == Some(&b'\n') {
                            i += 1;
                        }
                    }
                    b'\n' => {}
                    b'0'..=b'7' => {
                        let mut value = u32::from(escaped - b'0');
                        for _ in 0..2 {
                            match content.get(i) {
                                Some(&digit @ b'0'..=b'7') => {
                                    value = (value << 3) + u32::from(digit - b'0');
                                    i += 1;
                                }
                                _ => break,
                            }
                        }
                        out.push((value & 0xff) as u8);
                    }
                    // \( \) \\ and unknown escapes keep the escaped byte
                    other => out.push(other),
                }
            }
            b'\r' => {
                out.push(b'\n');
                if content.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}
