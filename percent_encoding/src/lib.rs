// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! URLs use special characters to indicate the parts of the request.
//! For example, a `?` indicates the start of a query string. In order for
//! that character to exist inside a path, it needs to be encoded differently.
//!
//! Percent encoding replaces reserved characters with the `%` character
//! followed by two hex digits, so `?` becomes `%3F`.
//!
//! This crate deliberately does not ship with a default set: the correct set
//! of bytes to encode depends on the URL component being written to, and the
//! caller is expected to name that set explicitly with [`AsciiSet`].

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

use core::{fmt, slice, str};

#[cfg(feature = "alloc")]
use alloc::{borrow::Cow, string::String, vec::Vec};

/// Represents a set of characters or bytes in the ASCII range.
///
/// This is used in [`percent_encode`] and [`utf8_percent_encode`].
/// This is done by constructing one of these sets, often starting from a
/// minimal [`CONTROLS`] set, and adding the characters that need to be
/// percent-encoded to it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AsciiSet {
    mask: [Chunk; ASCII_RANGE_LEN / BITS_PER_CHUNK],
}

type Chunk = u32;
const BITS_PER_CHUNK: usize = 32;
const ASCII_RANGE_LEN: usize = 0x80;

impl AsciiSet {
    /// Called with 0..=127
    const fn contains(&self, byte: u8) -> bool {
        let chunk = self.mask[byte as usize / BITS_PER_CHUNK];
        let mask = 1 << (byte as usize % BITS_PER_CHUNK);
        (chunk & mask) != 0
    }

    const fn should_percent_encode(&self, byte: u8) -> bool {
        !byte.is_ascii() || self.contains(byte)
    }

    pub const fn add(&self, byte: u8) -> Self {
        let mut mask = self.mask;
        mask[byte as usize / BITS_PER_CHUNK] |= 1 << (byte as usize % BITS_PER_CHUNK);
        AsciiSet { mask }
    }

    pub const fn remove(&self, byte: u8) -> Self {
        let mut mask = self.mask;
        mask[byte as usize / BITS_PER_CHUNK] &= !(1 << (byte as usize % BITS_PER_CHUNK));
        AsciiSet { mask }
    }
}

/// The set of 0x00 to 0x1F (C0 controls) and 0x7F (DEL).
///
/// This is the smallest reasonable set, and used as the basis for the rest in `url`.
pub const CONTROLS: &AsciiSet = &AsciiSet {
    mask: [!0, 0, 0, 0],
}
.add(0x7f);

macro_rules! static_assert {
    ($expression:expr) => {
        const _: () = [()][(!($expression)) as usize];
    };
}

static_assert!(CONTROLS.contains(0x00));
static_assert!(CONTROLS.contains(0x1f));
static_assert!(!CONTROLS.contains(0x20));
static_assert!(CONTROLS.contains(0x7f));

/// Everything that is not an ASCII letter or digit.
///
/// This is a superset of `CONTROLS`.
pub const NON_ALPHANUMERIC: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'-')
    .add(b'.')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'_')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'~');

#[inline]
fn to_hex_digit(value: u8) -> u8 {
    match value {
        0..=9 => b'0' + value,
        10..=15 => b'A' + (value - 10),
        _ => unreachable!(),
    }
}

#[inline]
fn from_hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Percent-encode the given bytes with the given set, and write the result to `f`.
///
/// This is used in the implementation of `Display` for `PercentEncode`.
fn encode_into(input: &[u8], ascii_set: &'static AsciiSet, f: &mut impl fmt::Write) -> fmt::Result {
    for &byte in input {
        if ascii_set.should_percent_encode(byte) {
            f.write_char('%')?;
            f.write_char(to_hex_digit(byte >> 4) as char)?;
            f.write_char(to_hex_digit(byte & 0x0f) as char)?;
        } else {
            // `should_percent_encode` returned false, so `byte` is plain ASCII.
            f.write_char(byte as char)?;
        }
    }
    Ok(())
}

/// Percent-encode the given bytes with the given set.
///
/// Non-ASCII bytes and bytes in `ascii_set` are replaced with `%HH` where `HH` is
/// the uppercase hexadecimal representation of the byte. All other bytes are
/// copied unchanged.
///
/// The return type:
///
/// * Implements `Display` and therefore has a `.to_string()` method,
/// * Implements `Into<Cow<str>>` borrowing `input` when none of its bytes are encoded.
#[inline]
pub fn percent_encode<'a>(input: &'a [u8], ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    PercentEncode { bytes: input, ascii_set }
}

/// Percent-encode the UTF-8 encoding of the given string with the given set.
#[inline]
pub fn utf8_percent_encode<'a>(input: &'a str, ascii_set: &'static AsciiSet) -> PercentEncode<'a> {
    percent_encode(input.as_bytes(), ascii_set)
}

/// The return type of [`percent_encode`] and [`utf8_percent_encode`].
#[derive(Clone)]
pub struct PercentEncode<'a> {
    bytes: &'a [u8],
    ascii_set: &'static AsciiSet,
}

impl<'a> fmt::Display for PercentEncode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        encode_into(self.bytes, self.ascii_set, f)
    }
}

#[cfg(feature = "alloc")]
impl<'a> From<PercentEncode<'a>> for Cow<'a, str> {
    fn from(pe: PercentEncode<'a>) -> Self {
        if pe.bytes.iter().any(|&b| pe.ascii_set.should_percent_encode(b)) {
            Cow::Owned(pe.to_string())
        } else {
            // All bytes are ASCII and not in the set: this is valid UTF-8.
            Cow::Borrowed(str::from_utf8(pe.bytes).unwrap())
        }
    }
}

#[cfg(feature = "alloc")]
impl<'a> PercentEncode<'a> {
    fn to_string(&self) -> String {
        let mut s = String::with_capacity(self.bytes.len());
        let _ = encode_into(self.bytes, self.ascii_set, &mut s);
        s
    }
}

/// Percent-decode the given bytes.
///
/// Any `%XY` where `X`/`Y` are not both hex digits is left unchanged, as is a
/// trailing lone `%`. Decoding never fails.
#[inline]
pub fn percent_decode(input: &[u8]) -> PercentDecode<'_> {
    PercentDecode { bytes: input.iter() }
}

/// Percent-decode the given string.
///
/// Note this returns bytes, not `&str`: the decoded data is not necessarily UTF-8,
/// even if the input is a valid string, since percent-encoding is clueless about
/// encodings.
#[inline]
pub fn percent_decode_str(input: &str) -> PercentDecode<'_> {
    percent_decode(input.as_bytes())
}

/// The return type of [`percent_decode`] and [`percent_decode_str`].
#[derive(Clone, Debug)]
pub struct PercentDecode<'a> {
    bytes: slice::Iter<'a, u8>,
}

fn after_percent_sign(iter: &mut slice::Iter<'_, u8>) -> Option<u8> {
    let mut cloned_iter = iter.clone();
    let h = from_hex_digit(*cloned_iter.next()?)?;
    let l = from_hex_digit(*cloned_iter.next()?)?;
    *iter = cloned_iter;
    Some(h * 0x10 + l)
}

impl<'a> Iterator for PercentDecode<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.bytes.next().map(|&byte| {
            if byte == b'%' {
                after_percent_sign(&mut self.bytes).unwrap_or(byte)
            } else {
                byte
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.bytes.size_hint();
        (0, upper)
    }
}

#[cfg(feature = "alloc")]
impl<'a> PercentDecode<'a> {
    /// Collect the decoded bytes into a `Vec<u8>`.
    pub fn collect_to_vec(self) -> Vec<u8> {
        self.collect()
    }

    /// If the decoded bytes are not UTF-8, replace invalid sequences with
    /// U+FFFD, the replacement character.
    pub fn decode_utf8_lossy(self) -> Cow<'a, str> {
        let bytes = self.clone().collect_to_vec();
        // Fast path: no percent-escapes at all means `self.bytes` already borrows valid UTF-8.
        if !self.bytes.as_slice().contains(&b'%') {
            if let Ok(s) = str::from_utf8(self.bytes.as_slice()) {
                return Cow::Borrowed(s);
            }
        }
        Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decode the result strictly as UTF-8, returning `Err` if it is not.
    pub fn decode_utf8(self) -> Result<Cow<'a, str>, str::Utf8Error> {
        if !self.bytes.as_slice().contains(&b'%') {
            str::from_utf8(self.bytes.as_slice()).map(Cow::Borrowed)
        } else {
            let bytes = self.collect_to_vec();
            let s = str::from_utf8(&bytes)?;
            Ok(Cow::Owned(s.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const PATH: &AsciiSet = &CONTROLS.add(b'?').add(b'#');

    #[test]
    fn encode_basic() {
        assert_eq!(utf8_percent_encode("foo bar?", PATH).to_string(), "foo%20bar%3F");
    }

    #[test]
    fn encode_uppercase_hex() {
        assert_eq!(percent_encode(&[0xff], CONTROLS).to_string(), "%FF");
    }

    #[test]
    fn decode_roundtrip() {
        let encoded = utf8_percent_encode("a/b?c#d", NON_ALPHANUMERIC).to_string();
        let decoded: Vec<u8> = percent_decode_str(&encoded).collect();
        assert_eq!(decoded, b"a/b?c#d");
    }

    #[test]
    fn decode_lone_percent_is_literal() {
        let decoded: Vec<u8> = percent_decode_str("100%").collect();
        assert_eq!(decoded, b"100%");
    }

    #[test]
    fn decode_invalid_hex_is_literal() {
        let decoded: Vec<u8> = percent_decode_str("%zz").collect();
        assert_eq!(decoded, b"%zz");
    }

    #[test]
    fn decode_utf8_lossy_borrows_when_untouched() {
        match percent_decode_str("no percent here").decode_utf8_lossy() {
            Cow::Borrowed(_) => {}
            Cow::Owned(_) => panic!("expected a borrow"),
        }
    }

    #[test]
    fn idempotence() {
        // encode(decode(encode(x, S)), S) == encode(x, S)
        let x = "a b%c";
        let once = utf8_percent_encode(x, NON_ALPHANUMERIC).to_string();
        let decoded = percent_decode_str(&once).collect_to_vec();
        let twice = percent_encode(&decoded, NON_ALPHANUMERIC).to_string();
        assert_eq!(once, twice);
    }
}
