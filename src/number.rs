//! Classification of unquoted numeric and date/time literals.
//!
//! A literal is first delimited by [`literal_end`], then [`classify`] decides
//! in a single scan whether it is an integer, a float or a date/time and
//! converts it accordingly.

#[cfg(test)]
#[path = "./number_tests.rs"]
mod tests;

use crate::{DecodeOptions, ErrorKind, time::DateTime};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Literal {
    Integer(i64),
    Float(f64),
    DateTime(DateTime),
}

/// End offset of the literal starting at `start`.
///
/// A literal stops at whitespace, a newline, `,`, `]`, `}`, `#` or the end of
/// input. The one exception is the space that may separate a date from a
/// time: it is taken when the text so far is a full date and a digit follows.
pub(crate) fn literal_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while let Some(&b) = bytes.get(end) {
        match b {
            b' ' if is_full_date(&bytes[start..end])
                && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) =>
            {
                end += 1;
            }
            b' ' | b'\t' | b'\n' | b'\r' | b',' | b']' | b'}' | b'#' => break,
            _ => end += 1,
        }
    }
    end
}

fn is_full_date(text: &[u8]) -> bool {
    text.len() == 10 && text[4] == b'-' && text[7] == b'-'
}

/// Converts a delimited literal, the error kind is reported for the whole
/// literal.
pub(crate) fn classify(text: &str, options: &DecodeOptions) -> Result<Literal, ErrorKind> {
    match text {
        "inf" | "+inf" => return Ok(Literal::Float(f64::INFINITY)),
        "-inf" => return Ok(Literal::Float(f64::NEG_INFINITY)),
        "nan" | "+nan" => return Ok(Literal::Float(f64::NAN.copysign(1.0))),
        "-nan" => return Ok(Literal::Float(f64::NAN.copysign(-1.0))),
        _ => {}
    }

    let (negative, signed, body) = match text.as_bytes().first() {
        Some(b'-') => (true, true, &text[1..]),
        Some(b'+') => (false, true, &text[1..]),
        _ => (false, false, text),
    };

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = body.strip_prefix(prefix) {
            if signed {
                return Err(ErrorKind::InvalidNumber);
            }
            return radix_integer(digits, radix, options);
        }
    }

    let bytes = body.as_bytes();
    let mut is_float = false;
    let mut is_date = false;
    for (i, &b) in bytes.iter().enumerate() {
        let prev = if i == 0 { None } else { Some(bytes[i - 1]) };
        match b {
            b'0'..=b'9' => {}
            b'_' => {
                let next = bytes.get(i + 1);
                if is_date
                    || !prev.is_some_and(|p| p.is_ascii_digit())
                    || !next.is_some_and(u8::is_ascii_digit)
                {
                    return Err(ErrorKind::InvalidNumber);
                }
            }
            b'.' if !is_date => is_float = true,
            b'e' | b'E' if !is_date => is_float = true,
            b'+' | b'-' if matches!(prev, Some(b'e' | b'E')) && !is_date => {}
            b'-' | b':' if prev.is_some_and(|p| p.is_ascii_digit()) => is_date = true,
            b'.' | b'-' | b':' | b'+' | b'T' | b't' | b' ' | b'Z' | b'z' if is_date => {}
            _ => return Err(ErrorKind::InvalidNumber),
        }
    }

    if is_date {
        if signed {
            return Err(ErrorKind::InvalidDateTime);
        }
        return match DateTime::munch(bytes) {
            Some((consumed, value)) if consumed == bytes.len() => Ok(Literal::DateTime(value)),
            _ => Err(ErrorKind::InvalidDateTime),
        };
    }
    if is_float {
        return float(body, negative, options).map(Literal::Float);
    }
    decimal_integer(body, negative, options)
}

/// An integer too large for `i64` becomes an infinite float unless overflow
/// errors are requested.
fn overflow(negative: bool, options: &DecodeOptions) -> Result<Literal, ErrorKind> {
    if options.overflow_errors {
        Err(ErrorKind::OutOfRange("i64"))
    } else if negative {
        Ok(Literal::Float(f64::NEG_INFINITY))
    } else {
        Ok(Literal::Float(f64::INFINITY))
    }
}

/// Digits of a `0x`/`0o`/`0b` integer, underscores only between digits.
fn radix_integer(digits: &str, radix: u32, options: &DecodeOptions) -> Result<Literal, ErrorKind> {
    let bytes = digits.as_bytes();
    if bytes.is_empty() {
        return Err(ErrorKind::InvalidNumber);
    }
    let mut value: i64 = 0;
    let mut overflowed = false;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let between = i > 0
                && bytes[i - 1] != b'_'
                && bytes.get(i + 1).is_some_and(|n| *n != b'_');
            if !between {
                return Err(ErrorKind::InvalidNumber);
            }
            continue;
        }
        let Some(d) = (b as char).to_digit(radix) else {
            return Err(ErrorKind::InvalidNumber);
        };
        match value
            .checked_mul(radix as i64)
            .and_then(|v| v.checked_add(d as i64))
        {
            Some(v) => value = v,
            None => overflowed = true,
        }
    }
    if overflowed {
        return overflow(false, options);
    }
    Ok(Literal::Integer(value))
}

fn decimal_integer(
    body: &str,
    negative: bool,
    options: &DecodeOptions,
) -> Result<Literal, ErrorKind> {
    let bytes = body.as_bytes();
    match bytes {
        [] => return Err(ErrorKind::InvalidNumber),
        [b'0', _, ..] => return Err(ErrorKind::InvalidNumber),
        _ => {}
    }
    // Accumulate on the negative side so that i64::MIN is representable.
    let mut value: i64 = 0;
    let mut overflowed = false;
    for &b in bytes {
        if b == b'_' {
            continue;
        }
        let d = (b - b'0') as i64;
        match value.checked_mul(10).and_then(|v| v.checked_sub(d)) {
            Some(v) => value = v,
            None => overflowed = true,
        }
    }
    if overflowed {
        return overflow(negative, options);
    }
    if negative {
        return Ok(Literal::Integer(value));
    }
    match value.checked_neg() {
        Some(v) => Ok(Literal::Integer(v)),
        None => overflow(false, options),
    }
}

/// Validates the TOML float grammar (`int [. digits] [e [+-] digits]`, at
/// least one of fraction or exponent) and converts it.
fn float(body: &str, negative: bool, options: &DecodeOptions) -> Result<f64, ErrorKind> {
    let bytes = body.as_bytes();
    let digits = |from: usize| {
        let mut end = from;
        while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'_') {
            end += 1;
        }
        end
    };

    let int_end = digits(0);
    let integral = &bytes[..int_end];
    if integral.is_empty() || (integral.len() > 1 && integral[0] == b'0') {
        return Err(ErrorKind::InvalidNumber);
    }
    let mut pos = int_end;
    let mut mantissa_nonzero = integral.iter().any(|b| matches!(b, b'1'..=b'9'));

    if bytes.get(pos) == Some(&b'.') {
        let frac_end = digits(pos + 1);
        if frac_end == pos + 1 {
            return Err(ErrorKind::InvalidNumber);
        }
        mantissa_nonzero |= bytes[pos + 1..frac_end]
            .iter()
            .any(|b| matches!(b, b'1'..=b'9'));
        pos = frac_end;
    }
    if let Some(b'e' | b'E') = bytes.get(pos) {
        pos += 1;
        if let Some(b'+' | b'-') = bytes.get(pos) {
            pos += 1;
        }
        let exp_end = digits(pos);
        if exp_end == pos {
            return Err(ErrorKind::InvalidNumber);
        }
        pos = exp_end;
    }
    if pos != bytes.len() {
        return Err(ErrorKind::InvalidNumber);
    }

    let cleaned: String = body.chars().filter(|c| *c != '_').collect();
    let magnitude: f64 = match cleaned.parse() {
        Ok(f) => f,
        Err(_) => return Err(ErrorKind::InvalidNumber),
    };

    if magnitude.is_infinite() && options.overflow_errors {
        return Err(ErrorKind::OutOfRange("f64"));
    }
    if mantissa_nonzero
        && (magnitude == 0.0 || magnitude.is_subnormal())
        && options.underflow_errors
    {
        return Err(ErrorKind::OutOfRange("f64"));
    }
    Ok(if negative { -magnitude } else { magnitude })
}
