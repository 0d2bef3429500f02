// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and serializer for the [`application/x-www-form-urlencoded`
//! syntax](https://url.spec.whatwg.org/#application/x-www-form-urlencoded),
//! as used by HTML forms and by [`Url::query_pairs`](../url/struct.Url.html#method.query_pairs).

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use percent_encoding::{percent_decode, percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Convert a byte string in the `application/x-www-form-urlencoded` syntax
/// into a iterator of (name, value) pairs.
///
/// Use [`parse(input.as_bytes())`](fn.parse.html) to parse a `&str` input.
///
/// The names and values are percent-decoded, and `+` is interpreted as a
/// literal space as required by the form-urlencoded syntax (unlike general
/// percent-decoding, which leaves `+` alone).
pub fn parse(input: &[u8]) -> Parse<'_> {
    Parse { input }
}

/// The return type of [`parse`].
#[derive(Copy, Clone)]
pub struct Parse<'a> {
    input: &'a [u8],
}

impl<'a> Iterator for Parse<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.input.is_empty() {
                return None;
            }
            let pair_end = self
                .input
                .iter()
                .position(|&b| b == b'&')
                .unwrap_or(self.input.len());
            let pair = &self.input[..pair_end];
            self.input = if pair_end < self.input.len() {
                &self.input[pair_end + 1..]
            } else {
                &[]
            };
            if pair.is_empty() {
                continue;
            }
            let mut split = pair.splitn(2, |&b| b == b'=');
            let name = split.next().unwrap();
            let value = split.next().unwrap_or(&[][..]);
            return Some((decode(name), decode(value)));
        }
    }
}

fn decode(input: &[u8]) -> Cow<'_, str> {
    if !input.contains(&b'+') && !input.contains(&b'%') {
        // Fast path: nothing to decode, borrow straight from the input.
        return String::from_utf8_lossy(input);
    }
    // `+` means literal space in this syntax, distinct from plain percent-decoding.
    let replaced: Vec<u8> = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    Cow::Owned(percent_decode(&replaced).decode_utf8_lossy().into_owned())
}

/// The [`application/x-www-form-urlencoded` percent-encode
/// set](https://url.spec.whatwg.org/#application-x-www-form-urlencoded-percent-encode-set).
const FORM_URLENCODED_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// An accumulator that serializes (name, value) pairs in the
/// `application/x-www-form-urlencoded` syntax, one call to
/// [`append_pair`](#method.append_pair) or
/// [`append_key_only`](#method.append_key_only) at a time.
pub struct Serializer<T: Target> {
    target: Option<T>,
    start_position: usize,
    encoding_override: Option<()>,
}

/// A target for a `Serializer`: either `String` or `Vec<u8>`.
pub trait Target {
    /// Called to append raw bytes (already percent-encoded).
    fn as_mut_string(&mut self) -> &mut String;
    /// Consume `self` and return the built value.
    fn finish(self) -> Self::Finished;
    type Finished;
}

impl Target for String {
    fn as_mut_string(&mut self) -> &mut String {
        self
    }
    fn finish(self) -> String {
        self
    }
    type Finished = String;
}

impl<T: Target> Serializer<T> {
    /// Create a new `Serializer` that will append to the given target, after
    /// its existing content if any.
    pub fn new(target: T) -> Self {
        let mut target = target;
        let start_position = target.as_mut_string().len();
        Serializer {
            target: Some(target),
            start_position,
            encoding_override: None,
        }
    }

    /// Remove any existing name/value pairs and start fresh.
    pub fn clear(&mut self) -> &mut Self {
        let target = self.target.as_mut().expect("Serializer finished");
        target.as_mut_string().truncate(self.start_position);
        self
    }

    fn append_separator_if_needed(&mut self) {
        let target = self.target.as_mut().expect("Serializer finished");
        if target.as_mut_string().len() > self.start_position {
            target.as_mut_string().push('&');
        }
    }

    /// Append one (name, value) pair.
    pub fn append_pair(&mut self, name: &str, value: &str) -> &mut Self {
        self.append_separator_if_needed();
        let target = self.target.as_mut().expect("Serializer finished");
        append_encoded(name, target.as_mut_string());
        target.as_mut_string().push('=');
        append_encoded(value, target.as_mut_string());
        self
    }

    /// Append a name with no `=value` part.
    pub fn append_key_only(&mut self, name: &str) -> &mut Self {
        self.append_separator_if_needed();
        let target = self.target.as_mut().expect("Serializer finished");
        append_encoded(name, target.as_mut_string());
        self
    }

    /// Append each pair yielded by the given iterator.
    pub fn extend_pairs<I, K, V>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: core::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for pair in iter {
            let &(ref k, ref v) = pair.borrow();
            self.append_pair(k.as_ref(), v.as_ref());
        }
        self
    }

    /// Finish building the serialized string, consuming the `Serializer`.
    pub fn finish(&mut self) -> T::Finished {
        let target = self.target.take().expect("Serializer finished");
        target.finish()
    }
}

fn append_encoded(input: &str, target: &mut String) {
    // The `+`-for-space convention only applies when *decoding*; encoding
    // still emits `%20` for a literal space.
    target.push_str(&percent_encode(input.as_bytes(), FORM_URLENCODED_ENCODE_SET).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn parse_basic_pairs() {
        let pairs: Vec<_> = parse(b"a=1&b=2")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![("a".to_owned(), "1".to_owned()), ("b".to_owned(), "2".to_owned())]
        );
    }

    #[test]
    fn parse_plus_is_space() {
        let pairs: Vec<_> = parse(b"q=a+b").map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs, vec![("q".to_owned(), "a b".to_owned())]);
    }

    #[test]
    fn parse_skips_empty_pairs() {
        let pairs: Vec<_> = parse(b"a=1&&b=2").collect();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn parse_key_only() {
        let pairs: Vec<_> = parse(b"a&b=2").map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs, vec![("a".to_owned(), "".to_owned()), ("b".to_owned(), "2".to_owned())]);
    }

    #[test]
    fn serialize_roundtrip() {
        let mut s = Serializer::new(String::new());
        s.append_pair("a", "1 2");
        s.append_pair("b", "x/y");
        let encoded = s.finish();
        assert_eq!(encoded, "a=1%202&b=x%2Fy");
        let pairs: Vec<_> = parse(encoded.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![("a".to_owned(), "1 2".to_owned()), ("b".to_owned(), "x/y".to_owned())]
        );
    }
}
