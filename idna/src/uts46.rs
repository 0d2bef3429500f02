// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/),
//! scoped to the operations the URL state machine needs: `ToASCII` and
//! `ToUnicode`.
//!
//! The full UTS #46 mapping table is tens of thousands of code point ranges
//! generated from Unicode's published data files; this module ships a
//! representative subset (ASCII case folding, a handful of default-ignorable
//! and disallowed code points) and otherwise treats code points as valid,
//! consistent with the mapping table being an external reference-data
//! concern rather than something the core parser owns.

use crate::punycode;
use std::{error::Error as StdError, fmt};
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const PUNYCODE_PREFIX: &str = "xn--";

enum Mapping {
    Valid,
    Ignored,
    Mapped(&'static str),
    Disallowed,
}

/// A representative subset of the UTS #46 mapping table: ASCII and a few
/// well-known special cases. Everything else maps to `Valid`.
fn find_char(c: char) -> Mapping {
    match c {
        'a'..='z' | '0'..='9' | '-' | '.' => Mapping::Valid,
        'A'..='Z' => Mapping::Mapped(ascii_lower_str(c)),
        // Soft hyphen and other default-ignorable formatting characters.
        '\u{00AD}' | '\u{200B}'..='\u{200D}' | '\u{FEFF}' => Mapping::Ignored,
        // True C0/C1 controls are disallowed unconditionally. Other ASCII
        // punctuation (space, `#`, `@`, ...) is STD3-disallowed-but-valid:
        // with UseSTD3ASCIIRules off (the URL host parser's setting) it
        // passes through here and is instead caught, where relevant, by the
        // forbidden-domain-code-point check the host parser runs afterwards.
        '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}' => Mapping::Disallowed,
        // Fullwidth full stop and friends map to ASCII '.', a well-known UTS46 case.
        '\u{3002}' | '\u{FF0E}' | '\u{FF61}' => Mapping::Mapped("."),
        _ => Mapping::Valid,
    }
}

fn ascii_lower_str(c: char) -> &'static str {
    const LOWER: [&str; 26] = [
        "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
        "s", "t", "u", "v", "w", "x", "y", "z",
    ];
    LOWER[(c as u8 - b'A') as usize]
}

fn map_char(c: char, output: &mut String, errors: &mut Vec<Error>) {
    match find_char(c) {
        Mapping::Valid => output.push(c),
        Mapping::Ignored => {}
        Mapping::Mapped(s) => output.push_str(s),
        Mapping::Disallowed => {
            errors.push(Error::DisallowedCharacter);
            output.push(c);
        }
    }
}

/// <https://tools.ietf.org/html/rfc5893#section-2>
fn passes_bidi(label: &str, is_bidi_domain: bool) -> bool {
    if !is_bidi_domain {
        return true;
    }
    let mut chars = label.chars();
    let first_char_class = match chars.next() {
        Some(c) => bidi_class(c),
        None => return true,
    };
    match first_char_class {
        BidiClass::L => {
            for c in chars {
                if !matches!(
                    bidi_class(c),
                    BidiClass::L
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            let last_non_nsm = label.chars().rev().find(|&c| bidi_class(c) != BidiClass::NSM);
            !matches!(last_non_nsm, Some(c) if bidi_class(c) != BidiClass::L && bidi_class(c) != BidiClass::EN)
        }
        BidiClass::R | BidiClass::AL => {
            let mut found_en = false;
            let mut found_an = false;
            for c in chars {
                let class = bidi_class(c);
                if class == BidiClass::EN {
                    found_en = true;
                } else if class == BidiClass::AN {
                    found_an = true;
                }
                if !matches!(
                    class,
                    BidiClass::R
                        | BidiClass::AL
                        | BidiClass::AN
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            if found_en && found_an {
                return false;
            }
            let last = label.chars().rev().find(|&c| bidi_class(c) != BidiClass::NSM);
            matches!(
                last,
                Some(c) if matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::EN | BidiClass::AN)
            )
        }
        _ => false,
    }
}

/// <http://www.unicode.org/reports/tr46/#Validity_Criteria>
fn is_valid(label: &str, config: Config) -> bool {
    let first_char = match label.chars().next() {
        Some(c) => c,
        None => return true,
    };
    if config.check_hyphens && (label.starts_with('-') || label.ends_with('-')) {
        return false;
    }
    if is_combining_mark(first_char) {
        return false;
    }
    if label.chars().any(|c| matches!(find_char(c), Mapping::Disallowed)) {
        return false;
    }
    true
}

fn is_bidi_domain(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::AN))
}

/// <http://www.unicode.org/reports/tr46/#Processing>
fn processing(domain: &str, config: Config, errors: &mut Vec<Error>) -> String {
    let mut mapped = String::with_capacity(domain.len());
    for c in domain.chars() {
        map_char(c, &mut mapped, errors);
    }
    let normalized: String = mapped.nfc().collect();

    let mut validated = String::with_capacity(normalized.len());
    let (mut first, mut valid, mut has_bidi_labels) = (true, true, false);
    for label in normalized.split('.') {
        if !first {
            validated.push('.');
        }
        first = false;
        if let Some(rest) = label.strip_prefix(PUNYCODE_PREFIX) {
            match punycode::decode_to_string(rest) {
                Some(decoded_label) => {
                    if !has_bidi_labels {
                        has_bidi_labels |= is_bidi_domain(&decoded_label);
                    }
                    if decoded_label.nfc().ne(decoded_label.chars()) || !is_valid(&decoded_label, config)
                    {
                        valid = false;
                    }
                    validated.push_str(&decoded_label);
                }
                None => {
                    has_bidi_labels = true;
                    errors.push(Error::PunycodeError);
                }
            }
        } else {
            if !has_bidi_labels {
                has_bidi_labels |= is_bidi_domain(label);
            }
            valid &= is_valid(label, config);
            validated.push_str(label);
        }
    }

    if config.check_bidi {
        for label in validated.split('.') {
            if !passes_bidi(label, has_bidi_labels) {
                valid = false;
                break;
            }
        }
    }

    if !valid {
        errors.push(Error::ValidityCriteria);
    }
    validated
}

/// Options governing [`Config::to_ascii`] / [`Config::to_unicode`].
///
/// The defaults are those of <https://url.spec.whatwg.org/#idna>.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    transitional_processing: bool,
    check_hyphens: bool,
    check_bidi: bool,
    verify_dns_length: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transitional_processing: false,
            check_hyphens: false,
            check_bidi: true,
            // Only relevant for `to_ascii`, not `to_unicode`.
            verify_dns_length: false,
        }
    }
}

impl Config {
    #[inline]
    pub fn transitional_processing(mut self, value: bool) -> Self {
        self.transitional_processing = value;
        self
    }

    #[inline]
    pub fn check_hyphens(mut self, value: bool) -> Self {
        self.check_hyphens = value;
        self
    }

    #[inline]
    pub fn check_bidi(mut self, value: bool) -> Self {
        self.check_bidi = value;
        self
    }

    #[inline]
    pub fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }

    /// <http://www.unicode.org/reports/tr46/#ToASCII>
    pub fn to_ascii(self, domain: &str) -> Result<String, Errors> {
        let mut errors = Vec::new();
        let mut result = String::with_capacity(domain.len());
        let mut first = true;
        for label in processing(domain, self, &mut errors).split('.') {
            if !first {
                result.push('.');
            }
            first = false;
            if label.is_ascii() {
                result.push_str(label);
            } else {
                match punycode::encode_str(label) {
                    Some(x) => {
                        result.push_str(PUNYCODE_PREFIX);
                        result.push_str(&x);
                    }
                    None => errors.push(Error::PunycodeError),
                }
            }
        }

        if self.verify_dns_length {
            let d = result.strip_suffix('.').unwrap_or(&result);
            if d.is_empty() || d.split('.').any(|label| label.is_empty()) {
                errors.push(Error::TooShortForDns);
            }
            if d.len() > 253 || d.split('.').any(|label| label.len() > 63) {
                errors.push(Error::TooLongForDns);
            }
        }

        if errors.is_empty() {
            Ok(result)
        } else {
            Err(Errors(errors))
        }
    }

    /// <http://www.unicode.org/reports/tr46/#ToUnicode>
    pub fn to_unicode(self, domain: &str) -> (String, Result<(), Errors>) {
        let mut errors = Vec::new();
        let domain = processing(domain, self, &mut errors);
        let result = if errors.is_empty() { Ok(()) } else { Err(Errors(errors)) };
        (domain, result)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Error {
    PunycodeError,
    ValidityCriteria,
    DisallowedCharacter,
    TooLongForDns,
    TooShortForDns,
}

impl Error {
    fn as_str(&self) -> &str {
        match self {
            Error::PunycodeError => "punycode error",
            Error::ValidityCriteria => "failed UTS #46 validity criteria",
            Error::DisallowedCharacter => "disallowed character",
            Error::TooLongForDns => "too long for DNS",
            Error::TooShortForDns => "too short for DNS",
        }
    }
}

/// Errors recorded during UTS #46 processing.
///
/// Opaque for now: only the presence of at least one error is exposed
/// through `Display`.
#[derive(Debug)]
pub struct Errors(Vec<Error>);

impl StdError for Errors {}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(err.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_domain_is_lowercased() {
        assert_eq!(Config::default().to_ascii("Example.COM").unwrap(), "example.com");
    }

    #[test]
    fn unicode_domain_is_punycoded() {
        let out = Config::default().to_ascii("\u{1F4A9}.com").unwrap();
        assert!(out.starts_with("xn--"));
        assert!(out.ends_with(".com"));
    }

    #[test]
    fn empty_label_is_preserved_for_outer_caller_to_reject() {
        // IDNA processing itself does not reject "ends in a number"-adjacent
        // shapes; that check belongs to the URL host parser.
        assert_eq!(Config::default().to_ascii("a..b").unwrap(), "a..b");
    }

    #[test]
    fn to_unicode_roundtrips_ascii() {
        let (out, result) = Config::default().to_unicode("example.com");
        assert!(result.is_ok());
        assert_eq!(out, "example.com");
    }

    #[test]
    fn verify_dns_length_rejects_overlong_label() {
        let long_label = "a".repeat(64);
        let domain = format!("{long_label}.com");
        assert!(Config::default().verify_dns_length(true).to_ascii(&domain).is_err());
    }
}
