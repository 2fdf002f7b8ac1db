//! Number serialization for the PDF writing path
//!
//! Integers and reals are turned into the exact ASCII bytes written into the
//! output file. The standard precision mode reproduces the rounding of the
//! Acrobat family of renderers digit for digit, so two runs over the same
//! document always produce identical bytes (signatures depend on it).
//!
//! All encoders write with [`ByteBuffer::prepend`]: the least significant
//! digit goes in first and the sign last. The buffer must have enough room
//! left for the whole number.

use crate::buffer::ByteBuffer;
use std::io::Write;

const DIGITS: &[u8; 10] = b"0123456789";

/// Room needed by any standard precision real, sign included
pub const DOUBLE_BUFFER_CAPACITY: usize = 24;

/// Number of decimal digits in `n`
pub fn int_size(mut n: u64) -> usize {
    let mut size = 1;
    while n >= 10 {
        n /= 10;
        size += 1;
    }
    size
}

/// Bytes needed to encode `n`, sign included
pub fn encoded_int_len(n: i64) -> usize {
    int_size(n.unsigned_abs()) + usize::from(n < 0)
}

/// Prepend the decimal digits of `n` to `buffer`
pub fn encode_int(n: i64, buffer: &mut ByteBuffer) {
    let mut value = n.unsigned_abs();
    for _ in 0..int_size(value) {
        buffer.prepend(DIGITS[(value % 10) as usize]);
        value /= 10;
    }
    if n < 0 {
        buffer.prepend(b'-');
    }
}

/// Encode `n` into a freshly allocated, exactly sized byte vector
pub fn int_to_bytes(n: i64) -> Vec<u8> {
    let mut buffer = ByteBuffer::with_capacity(encoded_int_len(n));
    encode_int(n, &mut buffer);
    buffer.prepended_bytes().to_vec()
}

/// Prepend the canonical form of `value` to `buffer`.
///
/// In high precision mode up to six fractional digits are kept, trailing
/// zeros trimmed. Otherwise the legacy renderer rounding applies: at most
/// five fractional digits below one, two up to 32767, none above.
///
/// # Panics
///
/// Panics if `buffer` lacks room for the encoded form. Standard precision
/// always fits in [`DOUBLE_BUFFER_CAPACITY`] bytes; high precision output
/// of magnitudes above 1e16 may not.
pub fn encode_double(value: f64, buffer: &mut ByteBuffer, high_precision: bool) {
    if high_precision {
        buffer.prepend_slice(format_high_precision(value).as_bytes());
        return;
    }

    if !value.is_finite() {
        tracing::error!("Non-finite number {} written as 0", value);
        buffer.prepend(b'0');
        return;
    }
    if value.abs() < 0.000015 {
        buffer.prepend(b'0');
        return;
    }

    let negative = value < 0.0;
    let mut d = value.abs();

    if d < 1.0 {
        d += 0.000005;
        if d >= 1.0 {
            buffer.prepend(b'1');
        } else {
            let mut v = (d * 100000.0) as i64;
            let mut len = 5;
            while len > 0 && v % 10 == 0 {
                v /= 10;
                len -= 1;
            }
            for _ in 0..len {
                buffer.prepend(DIGITS[(v % 10) as usize]);
                v /= 10;
            }
            buffer.prepend(b'.').prepend(b'0');
        }
    } else if d <= 32767.0 {
        d += 0.005;
        let mut v = (d * 100.0) as i64;
        let int_len = match v {
            v if v >= 1_000_000 => 5,
            v if v >= 100_000 => 4,
            v if v >= 10_000 => 3,
            v if v >= 1_000 => 2,
            _ => 1,
        };
        // frac_len counts the decimal point
        let mut frac_len = 0;
        if v % 100 != 0 {
            frac_len = 2;
            if v % 10 != 0 {
                frac_len += 1;
            } else {
                v /= 10;
            }
        } else {
            v /= 100;
        }
        for _ in 1..frac_len {
            buffer.prepend(DIGITS[(v % 10) as usize]);
            v /= 10;
        }
        if frac_len > 0 {
            buffer.prepend(b'.');
        }
        for _ in 0..int_len {
            buffer.prepend(DIGITS[(v % 10) as usize]);
            v /= 10;
        }
    } else {
        let rounded = d + 0.5;
        let mut v = if rounded >= i64::MAX as f64 {
            i64::MAX
        } else {
            rounded as i64
        };
        for _ in 0..int_size(v as u64) {
            buffer.prepend(DIGITS[(v % 10) as usize]);
            v /= 10;
        }
    }

    if negative {
        buffer.prepend(b'-');
    }
}

/// Encode `value` into a freshly allocated byte vector
pub fn double_to_bytes(value: f64, high_precision: bool) -> Vec<u8> {
    if high_precision {
        return format_high_precision(value).into_bytes();
    }
    let mut buffer = ByteBuffer::with_capacity(DOUBLE_BUFFER_CAPACITY);
    encode_double(value, &mut buffer, false);
    buffer.prepended_bytes().to_vec()
}

/// Write the standard precision form of `value` to `writer`
pub fn write_double<W: Write>(writer: &mut W, value: f64) -> std::io::Result<()> {
    let mut buffer = ByteBuffer::with_capacity(DOUBLE_BUFFER_CAPACITY);
    encode_double(value, &mut buffer, false);
    writer.write_all(buffer.prepended_bytes())
}

/// Write the decimal form of `n` to `writer`
pub fn write_int<W: Write>(writer: &mut W, n: i64) -> std::io::Result<()> {
    let mut buffer = ByteBuffer::with_capacity(encoded_int_len(n));
    encode_int(n, &mut buffer);
    writer.write_all(buffer.prepended_bytes())
}

fn format_high_precision(value: f64) -> String {
    if !value.is_finite() {
        tracing::error!("Non-finite number {} written as 0", value);
        return "0".to_string();
    }
    if value.abs() < 0.000001 {
        return "0".to_string();
    }
    format!("{value:.6}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
