// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! URL parsing and serialization, conformant with the
//! [WHATWG URL Standard](https://url.spec.whatwg.org/).
//!
//! ```
//! use url::Url;
//!
//! let url = Url::parse("HTTP://Example.COM:80/foo/./bar/../baz?q#f").unwrap();
//! assert_eq!(url.as_str(), "http://example.com/foo/baz?q#f");
//! ```

mod encode_sets;
mod error;
mod host;
mod parser;
mod path;
mod scheme;

use std::fmt;
use std::str::FromStr;

use percent_encoding::{percent_decode_str, utf8_percent_encode};

pub use crate::error::{ParseError, SyntaxViolation};
pub use crate::host::Host;
use crate::encode_sets::{FRAGMENT, QUERY, SPECIAL_QUERY, USERINFO};
use crate::scheme::{self, scheme_type, SchemeType};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
enum Path {
    /// A non-special, authority-less URL's path: a single opaque string.
    Opaque(String),
    /// Everything else: a sequence of percent-encoded segments.
    List(Vec<String>),
}

/// A parsed, validated, canonicalized URL.
///
/// `Url` has value semantics: cloning it is a deep, independent copy.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Url {
    scheme: String,
    username: String,
    password: String,
    host: Option<Host<String>>,
    port: Option<u16>,
    path: Path,
    query: Option<String>,
    fragment: Option<String>,
}

/// A parse invocation with a base URL and/or a diagnostic sink.
///
/// Build with [`Url::options`], set what's needed, then call
/// [`ParseOptions::parse`].
pub struct ParseOptions<'a> {
    base_url: Option<&'a Url>,
    syntax_violation_callback: Option<&'a mut dyn FnMut(SyntaxViolation)>,
}

impl<'a> ParseOptions<'a> {
    pub fn base_url(mut self, base: Option<&'a Url>) -> Self {
        self.base_url = base;
        self
    }

    pub fn syntax_violation_callback(mut self, callback: Option<&'a mut dyn FnMut(SyntaxViolation)>) -> Self {
        self.syntax_violation_callback = callback;
        self
    }

    pub fn parse(mut self, input: &str) -> Result<Url, ParseError> {
        let mut noop = |_: SyntaxViolation| {};
        let vfn: &mut dyn FnMut(SyntaxViolation) = match &mut self.syntax_violation_callback {
            Some(cb) => *cb,
            None => &mut noop,
        };
        parser::parse(input, self.base_url, vfn)
    }
}

impl Url {
    /// Parse `input`, resolving relative references against `base` if given.
    pub fn parse(input: &str) -> Result<Url, ParseError> {
        Url::options().parse(input)
    }

    /// Parse `input` relative to this URL, as in an HTML `<a href>`.
    pub fn join(&self, input: &str) -> Result<Url, ParseError> {
        Url::options().base_url(Some(self)).parse(input)
    }

    /// Start building a [`ParseOptions`] for fine-grained control.
    pub fn options<'a>() -> ParseOptions<'a> {
        ParseOptions { base_url: None, syntax_violation_callback: None }
    }

    /// Like [`Url::parse`], but discards the result: useful for a validity check
    /// without paying for a full record (`:=` [§6 `can_parse`](https://url.spec.whatwg.org/#dom-url-canparse)).
    pub fn can_parse(input: &str, base: Option<&str>) -> bool {
        match base {
            Some(base) => match Url::parse(base) {
                Ok(base) => Url::options().base_url(Some(&base)).parse(input).is_ok(),
                Err(_) => false,
            },
            None => Url::parse(input).is_ok(),
        }
    }

    /// The canonical serialization of this URL.
    ///
    /// Allocates on each call; hang on to the result rather than calling
    /// this repeatedly in a loop.
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Consume the `Url`, returning its serialization.
    pub fn into_string(self) -> String {
        self.to_string()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    fn scheme_type(&self) -> SchemeType {
        scheme_type(&self.scheme)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(&self.password)
        }
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some() && !matches!(self.host, Some(Host::Empty))
    }

    pub fn host(&self) -> Option<Host<&str>> {
        self.host.as_ref().map(Host::as_ref)
    }

    pub fn host_str(&self) -> Option<String> {
        match &self.host {
            None | Some(Host::Empty) => None,
            Some(host) => Some(host.to_string()),
        }
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn port_or_known_default(&self) -> Option<u16> {
        self.port.or_else(|| scheme::default_port(&self.scheme))
    }

    pub fn has_opaque_path(&self) -> bool {
        matches!(self.path, Path::Opaque(_))
    }

    /// The path, always starting with `/` for a hierarchical URL, or the raw
    /// opaque string for a `has_opaque_path` URL.
    pub fn path(&self) -> String {
        match &self.path {
            Path::Opaque(s) => s.clone(),
            Path::List(segments) => join_path(segments),
        }
    }

    /// The path, segment by segment, or `None` for an opaque-path URL.
    pub fn path_segments(&self) -> Option<impl Iterator<Item = &str>> {
        match &self.path {
            Path::Opaque(_) => None,
            Path::List(segments) => Some(segments.iter().map(String::as_str)),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// An iterator over `application/x-www-form-urlencoded` query pairs.
    pub fn query_pairs(&self) -> form_urlencoded::Parse<'_> {
        form_urlencoded::parse(self.query().unwrap_or("").as_bytes())
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn set_scheme(&mut self, scheme: &str) -> Result<(), ()> {
        let new_scheme = scheme.to_ascii_lowercase();
        if !is_valid_scheme_string(&new_scheme) {
            return Err(());
        }
        let old_type = self.scheme_type();
        let new_type = scheme_type(&new_scheme);
        if old_type.is_special() != new_type.is_special() {
            return Err(());
        }
        if new_type.is_file() && (!self.username.is_empty() || !self.password.is_empty() || self.port.is_some()) {
            return Err(());
        }
        self.scheme = new_scheme;
        Ok(())
    }

    fn cannot_have_credentials_or_port(&self) -> bool {
        self.host.is_none()
            || matches!(self.host, Some(Host::Empty))
            || self.scheme_type().is_file()
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), ()> {
        if self.cannot_have_credentials_or_port() {
            return Err(());
        }
        self.username = utf8_percent_encode(username, USERINFO).to_string();
        Ok(())
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), ()> {
        if self.cannot_have_credentials_or_port() {
            return Err(());
        }
        self.password = utf8_percent_encode(password, USERINFO).to_string();
        Ok(())
    }

    pub fn set_host(&mut self, host: Option<&str>) -> Result<(), ParseError> {
        if self.has_opaque_path() {
            return Err(ParseError::SetHostOnOpaquePath);
        }
        let stype = self.scheme_type();
        match host {
            None if stype.is_special() && !stype.is_file() => Err(ParseError::HostMissing),
            None => {
                self.host = if stype.is_file() { Some(Host::Empty) } else { None };
                Ok(())
            }
            Some(s) => {
                let new_host = Host::parse(s, stype)?;
                if stype.is_special() && matches!(new_host, Host::Empty) {
                    return Err(ParseError::HostMissing);
                }
                self.host = Some(new_host);
                Ok(())
            }
        }
    }

    pub fn set_port(&mut self, port: Option<u16>) -> Result<(), ()> {
        if self.cannot_have_credentials_or_port() {
            return Err(());
        }
        self.port = match port {
            Some(p) if Some(p) == scheme::default_port(&self.scheme) => None,
            other => other,
        };
        Ok(())
    }

    pub fn set_path(&mut self, path: &str) {
        if self.has_opaque_path() {
            return;
        }
        let stype = self.scheme_type();
        let mut vfn = |_: SyntaxViolation| {};
        let (segments, _) = parser::parse_path_start(path, stype, stype.is_file(), &mut vfn);
        self.path = Path::List(segments);
    }

    pub fn set_query(&mut self, query: Option<&str>) {
        let set = if self.scheme_type().is_special() { SPECIAL_QUERY } else { QUERY };
        self.query = query.map(|q| utf8_percent_encode(q, set).to_string());
    }

    pub fn set_fragment(&mut self, fragment: Option<&str>) {
        self.fragment = fragment.map(|f| utf8_percent_encode(f, FRAGMENT).to_string());
    }

    /// The decoded username, for callers that do not want percent-encoded form.
    pub fn username_decoded(&self) -> std::borrow::Cow<'_, str> {
        percent_decode_str(&self.username).decode_utf8_lossy()
    }
}

fn is_valid_scheme_string(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn join_path(segments: &[String]) -> String {
    let mut s = String::new();
    for segment in segments {
        s.push('/');
        s.push_str(segment);
    }
    if s.is_empty() {
        s.push('/');
    }
    s
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(host) = &self.host {
            f.write_str("//")?;
            if !self.username.is_empty() || !self.password.is_empty() {
                f.write_str(&self.username)?;
                if !self.password.is_empty() {
                    write!(f, ":{}", self.password)?;
                }
                f.write_str("@")?;
            }
            write!(f, "{}", host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        } else if self.scheme_type().is_file() {
            f.write_str("//")?;
        }
        match &self.path {
            Path::Opaque(s) => f.write_str(s)?,
            Path::List(segments) => {
                if self.host.is_none() && !self.scheme_type().is_special() && segments.is_empty() {
                    // No leading `//` and no path: nothing more to write.
                } else {
                    f.write_str(&join_path(segments))?;
                }
            }
        }
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Url").field("serialization", &self.to_string()).finish()
    }
}

impl FromStr for Url {
    type Err = ParseError;
    fn from_str(input: &str) -> Result<Url, ParseError> {
        Url::parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_special_scheme_dot_segments() {
        let url = Url::parse("HTTP://Example.COM:80/foo/./bar/../baz?q#f").unwrap();
        assert_eq!(url.as_str(), "http://example.com/foo/baz?q#f");
        assert_eq!(url.host_str(), Some("example.com".to_owned()));
        assert_eq!(url.port(), None);
    }

    #[test]
    fn scenario_2_file_drive_letter_dot_dot() {
        let url = Url::parse("file:///C:/x/../y").unwrap();
        assert_eq!(url.as_str(), "file:///C:/y");
        assert!(!url.has_host());
    }

    #[test]
    fn scenario_3_userinfo_ipv6_port() {
        let url = Url::parse("http://user:pa%20ss@[2001:db8::1]:8080/p").unwrap();
        assert_eq!(url.as_str(), "http://user:pa%20ss@[2001:db8::1]:8080/p");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn scenario_4_relative_join() {
        let base = Url::parse("http://h/x/y").unwrap();
        let joined = base.join("a/b").unwrap();
        assert_eq!(joined.as_str(), "http://h/x/a/b");
    }

    #[test]
    fn scenario_5_ipv4_hex_octal_part() {
        let url = Url::parse("http://0x7f.1/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1/");
    }

    #[test]
    fn scenario_6_forbidden_host_code_point() {
        assert_eq!(Url::parse("http://exa mple.com/"), Err(ParseError::HostInvalid));
    }

    #[test]
    fn empty_input_without_base_is_scheme_missing() {
        assert_eq!(Url::parse(""), Err(ParseError::SchemeMissing));
    }

    #[test]
    fn default_port_is_never_serialized() {
        let url = Url::parse("https://example.com:443/").unwrap();
        assert_eq!(url.port(), None);
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn non_default_port_round_trips() {
        let url = Url::parse("https://example.com:8443/").unwrap();
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn ipv6_all_zero_compresses_to_double_colon() {
        let url = Url::parse("http://[::]/").unwrap();
        assert_eq!(url.as_str(), "http://[::]/");
    }

    #[test]
    fn port_65535_is_valid_65536_fails() {
        assert!(Url::parse("http://h:65535/").is_ok());
        assert_eq!(Url::parse("http://h:65536/"), Err(ParseError::PortOverflow));
    }

    #[test]
    fn parse_is_idempotent_after_first_serialization() {
        let u = Url::parse("HTTP://Example.COM:80/foo/./bar/../baz?q#f").unwrap();
        let once = u.as_str().to_owned();
        let twice = Url::parse(&once).unwrap().to_string();
        assert_eq!(once, twice);
    }

    #[test]
    fn opaque_path_scheme_has_no_authority() {
        let url = Url::parse("mailto:user@example.com").unwrap();
        assert!(url.has_opaque_path());
        assert_eq!(url.path(), "user@example.com");
        assert!(!url.has_host());
    }

    #[test]
    fn query_pairs_decode_form_urlencoded() {
        let url = Url::parse("http://h/?a=1&b=2").unwrap();
        let pairs: Vec<_> = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert_eq!(pairs, vec![("a".to_owned(), "1".to_owned()), ("b".to_owned(), "2".to_owned())]);
    }

    #[test]
    fn setter_is_no_op_on_failure() {
        let mut url = Url::parse("file:///C:/y").unwrap();
        let before = url.to_string();
        assert!(url.set_username("bob").is_err());
        assert_eq!(url.to_string(), before);
    }

    #[test]
    fn set_scheme_rejects_special_non_special_switch() {
        let mut url = Url::parse("http://h/").unwrap();
        assert!(url.set_scheme("mailto").is_err());
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn already_percent_encoded_path_is_passed_through() {
        let url = Url::parse("http://h/%25%2F%2525").unwrap();
        assert_eq!(url.path(), "/%25%2F%2525");
    }
}
