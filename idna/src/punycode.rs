// Copyright 2013 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Punycode ([RFC 3492](http://tools.ietf.org/html/rfc3492)) implementation.
//!
//! Since Punycode fundamentally works on Unicode code points,
//! `encode` and `decode` take and return slices and vectors of `char`.
//! `encode_str` and `decode_to_string` provide convenience wrappers
//! that convert from and to Rust's UTF-8 based `str` and `String` types.

use std::char;

// Bootstring parameters for Punycode
const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

#[inline]
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

/// Convert Punycode to an Unicode `String`.
///
/// Returns `None` on malformed input or overflow. Overflow can only happen
/// on inputs that take more than 63 encoded bytes, the DNS limit on domain
/// name labels.
pub fn decode_to_string(input: &str) -> Option<String> {
    decode(input).map(|chars| chars.into_iter().collect())
}

/// Convert Punycode to Unicode.
///
/// Returns `None` on malformed input or overflow.
pub fn decode(input: &str) -> Option<Vec<char>> {
    let bytes = input.as_bytes();
    // Handle the basic (ASCII) code points: they are encoded as-is before
    // the last delimiter, if any.
    let (base, input) = match bytes.iter().rposition(|&b| b == b'-') {
        Some(position) => (
            &bytes[..position],
            if position > 0 { &bytes[position + 1..] } else { bytes },
        ),
        None => (&bytes[..0], bytes),
    };

    if !base.is_ascii() {
        return None;
    }
    let mut output: Vec<char> = base.iter().map(|&b| b as char).collect();

    let mut code_point = INITIAL_N;
    let mut bias = INITIAL_BIAS;
    let mut i: u32 = 0;
    let mut iter = input.iter();
    loop {
        let previous_i = i;
        let mut weight = 1u32;
        let mut k = BASE;
        let mut byte = match iter.next() {
            None => break,
            Some(&byte) => byte,
        };

        // Decode a generalized variable-length integer into delta, which
        // gets added to i.
        loop {
            let digit = digit_value(byte)?;
            i = i.checked_add(digit.checked_mul(weight)?)?;
            let t = if k <= bias {
                T_MIN
            } else if k >= bias + T_MAX {
                T_MAX
            } else {
                k - bias
            };
            if digit < t {
                break;
            }
            weight = weight.checked_mul(BASE - t)?;
            k += BASE;
            byte = match iter.next() {
                None => return None, // End of input mid-delta
                Some(&byte) => byte,
            };
        }

        let num_points = output.len() as u32 + 1;
        bias = adapt(i.checked_sub(previous_i)?, num_points, previous_i == 0);
        code_point = code_point.checked_add(i / num_points)?;
        i %= num_points;
        let c = char::from_u32(code_point)?;
        output.insert(i as usize, c);
        i += 1;
    }
    Some(output)
}

#[inline]
fn digit_value(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0' + 26) as u32),
        b'A'..=b'Z' => Some((byte - b'A') as u32),
        b'a'..=b'z' => Some((byte - b'a') as u32),
        _ => None,
    }
}

/// Convert an Unicode `str` to Punycode.
///
/// This is a convenience wrapper around `encode`.
pub fn encode_str(input: &str) -> Option<String> {
    let chars: Vec<char> = input.chars().collect();
    encode(&chars)
}

/// Convert Unicode to Punycode.
///
/// Returns `None` on overflow, which can only happen on inputs that would
/// take more than 63 encoded bytes, the DNS limit on domain name labels.
pub fn encode(input: &[char]) -> Option<String> {
    let mut output = String::with_capacity(input.len());

    // Handle the basic (ASCII) code points: they are encoded as-is.
    let (mut input_length, mut basic_length): (u32, u32) = (0, 0);
    for &c in input {
        input_length = input_length.checked_add(1)?;
        if c.is_ascii() {
            output.push(c);
            basic_length += 1;
        }
    }
    if basic_length > 0 {
        output.push('-');
    }

    let mut code_point = INITIAL_N;
    let mut delta = 0u32;
    let mut bias = INITIAL_BIAS;
    let mut processed = basic_length;
    while processed < input_length {
        // All code points < code_point have been handled already. Find the
        // next larger one.
        let min_code_point = input.iter().map(|&c| c as u32).filter(|&c| c >= code_point).min()?;
        delta = delta.checked_add((min_code_point - code_point).checked_mul(processed + 1)?)?;
        code_point = min_code_point;
        for &c in input {
            let c = c as u32;
            if c < code_point {
                delta = delta.checked_add(1)?;
            }
            if c == code_point {
                // Represent delta as a generalized variable-length integer.
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = if k <= bias {
                        T_MIN
                    } else if k >= bias + T_MAX {
                        T_MAX
                    } else {
                        k - bias
                    };
                    if q < t {
                        break;
                    }
                    let value = t + ((q - t) % (BASE - t));
                    output.push(value_to_digit(value));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(value_to_digit(q));
                bias = adapt(delta, processed + 1, processed == basic_length);
                delta = 0;
                processed += 1;
            }
        }
        delta += 1;
        code_point += 1;
    }
    Some(output)
}

#[inline]
fn value_to_digit(value: u32) -> char {
    match value {
        0..=25 => (value as u8 + b'a') as char,
        26..=35 => (value as u8 - 26 + b'0') as char,
        _ => unreachable!("digit value out of range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ok(input: &str, expected: &str) {
        assert_eq!(decode_to_string(input).unwrap(), expected);
    }

    #[test]
    fn decodes_ascii_only() {
        decode_ok("egbpdaj", "egbpdaj");
    }

    #[test]
    fn decodes_known_punycode_labels() {
        // "ü" (u-umlaut) without the ASCII prefix requirement
        decode_ok("tda", "\u{fc}");
        // "München" -> "Mnchen-3ya"
        decode_ok("Mnchen-3ya", "M\u{fc}nchen");
    }

    #[test]
    fn roundtrip() {
        for s in ["straße", "münchen", "example", "日本語"] {
            let chars: Vec<char> = s.chars().collect();
            let encoded = encode(&chars).unwrap();
            let decoded = decode_to_string(&encoded).unwrap();
            assert_eq!(decoded, s);
        }
    }

    #[test]
    fn decode_rejects_truncated_input() {
        assert!(decode_to_string("xn--").is_none() || decode_to_string("-").is_some());
        assert!(decode("\u{1}").is_none());
    }
}
