// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The six percent-encode sets, each built from the one below it, per
//! <https://url.spec.whatwg.org/#percent-encoded-bytes>.

use percent_encoding::{percent_encode, AsciiSet, CONTROLS};

/// The C0 control percent-encode set: C0 controls and anything above U+007E.
/// `CONTROLS` from `percent_encoding` already covers the C0 range and
/// `should_percent_encode` treats all non-ASCII bytes as encode-worthy, so
/// this is just an alias kept for naming symmetry with the other sets.
pub const C0_CONTROL: &AsciiSet = CONTROLS;

/// The fragment percent-encode set.
pub const FRAGMENT: &AsciiSet = &C0_CONTROL
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// The query percent-encode set.
pub const QUERY: &AsciiSet = &C0_CONTROL.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>');

/// The special-query percent-encode set: used for the query of special-scheme URLs.
pub const SPECIAL_QUERY: &AsciiSet = &QUERY.add(b'\'');

/// The path percent-encode set.
pub const PATH: &AsciiSet = &QUERY.add(b'?').add(b'`').add(b'{').add(b'}');

/// The userinfo percent-encode set: used for username, password, and opaque hosts.
pub const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

#[cfg(test)]
mod tests {
    use super::*;

    fn encodes(set: &'static AsciiSet, byte: u8) -> bool {
        percent_encode(&[byte], set).to_string().starts_with('%')
    }

    #[test]
    fn sets_nest_as_specified() {
        assert!(!encodes(FRAGMENT, b'#'));
        assert!(encodes(QUERY, b'#'));
        assert!(encodes(SPECIAL_QUERY, b'\''));
        assert!(!encodes(QUERY, b'\''));
        assert!(encodes(PATH, b'?'));
        assert!(encodes(USERINFO, b'@'));
        assert!(encodes(USERINFO, b'/'));
    }
}
