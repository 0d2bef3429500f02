// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error;
use std::fmt;

/// Errors that can occur during parsing, any of which abort the parse and
/// leave no record behind.
///
/// This is the "failure" tier. The other tier, [`SyntaxViolation`], is
/// recorded but never aborts a parse.
#[non_exhaustive]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ParseError {
    SchemeMissing,
    SchemeInvalid,
    HostMissing,
    HostInvalid,
    Ipv4Overflow,
    Ipv4TooManyParts,
    Ipv6Invalid,
    PortOverflow,
    PortInvalid,
    IdnaFailure,
    RelativeUrlWithoutBase,
    RelativeUrlWithNonRelativeBase,
    InputTooLong,
    SetHostOnOpaquePath,
    SetPathOnOpaquePath,
    Overflow,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseError::SchemeMissing => "relative URL without a scheme",
            ParseError::SchemeInvalid => "scheme does not start with an ASCII letter",
            ParseError::HostMissing => "empty host",
            ParseError::HostInvalid => "invalid host code point",
            ParseError::Ipv4Overflow => "IPv4 address part outside its range",
            ParseError::Ipv4TooManyParts => "IPv4 address with more than four parts",
            ParseError::Ipv6Invalid => "invalid IPv6 address",
            ParseError::PortOverflow => "invalid port number",
            ParseError::PortInvalid => "port number is not all ASCII digits",
            ParseError::IdnaFailure => "IDNA domain-to-ASCII processing failed",
            ParseError::RelativeUrlWithoutBase => "relative URL without a base",
            ParseError::RelativeUrlWithNonRelativeBase => "relative URL with a cannot-be-a-base base",
            ParseError::InputTooLong => "URLs more than 4 GiB are not supported",
            ParseError::SetHostOnOpaquePath => "URLs with opaque paths cannot have a host",
            ParseError::SetPathOnOpaquePath => "URLs with opaque paths cannot have a hierarchical path set",
            ParseError::Overflow => "overflow",
        })
    }
}

impl Error for ParseError {}

/// A deviation from strict syntax that the parser tolerates: recorded, but
/// never causes a parse failure. See §7 of the design notes for the full
/// two-tier error model this implements.
#[non_exhaustive]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SyntaxViolation {
    Backslash,
    C0SpaceIgnored,
    EmbeddedCredentials,
    ExpectedDoubleSlash,
    ExpectedFileDoubleSlash,
    FileWithHostAndWindowsDrive,
    NonUrlCodePoint,
    NullInFragment,
    PercentDecode,
    TabOrNewlineIgnored,
    UnknownScheme,
}

impl SyntaxViolation {
    pub fn description(&self) -> &'static str {
        match self {
            SyntaxViolation::Backslash => "backslash",
            SyntaxViolation::C0SpaceIgnored => "leading or trailing control or space character are ignored in URLs",
            SyntaxViolation::EmbeddedCredentials => "embedding authentication information (username or password) in an URL is not recommended",
            SyntaxViolation::ExpectedDoubleSlash => "expected //",
            SyntaxViolation::ExpectedFileDoubleSlash => "expected // after file:",
            SyntaxViolation::FileWithHostAndWindowsDrive => "file: with host and Windows drive letter",
            SyntaxViolation::NonUrlCodePoint => "non-URL code point",
            SyntaxViolation::NullInFragment => "NULL characters are ignored in URL fragment identifiers",
            SyntaxViolation::PercentDecode => "expected 2 hex digits after %",
            SyntaxViolation::TabOrNewlineIgnored => "tabs or newlines are ignored in URLs",
            SyntaxViolation::UnknownScheme => "unknown scheme",
        }
    }
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
