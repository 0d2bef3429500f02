// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The URL parsing state machine:
//! <https://url.spec.whatwg.org/#url-parsing>.

use percent_encoding::utf8_percent_encode;

use crate::encode_sets::{C0_CONTROL, FRAGMENT, PATH, QUERY, SPECIAL_QUERY, USERINFO};
use crate::error::{ParseError, SyntaxViolation};
use crate::host::Host;
use crate::path::push_path_segment;
use crate::scheme::{default_port, scheme_type, SchemeType};
use crate::{Path, Url};

pub type Violation<'a> = dyn FnMut(SyntaxViolation) + 'a;

/// Entry point: parse `input`, resolving against `base` when `input` has no
/// scheme of its own.
pub fn parse(input: &str, base: Option<&Url>, vfn: &mut Violation<'_>) -> Result<Url, ParseError> {
    if input.len() as u64 > u32::MAX as u64 {
        return Err(ParseError::InputTooLong);
    }

    let trimmed = trim_c0_and_space(input, vfn);
    let cleaned = strip_tab_and_newline(trimmed, vfn);

    match parse_scheme(&cleaned) {
        Some((scheme, remaining)) => {
            let stype = scheme_type(&scheme);
            if stype.is_file() {
                return parse_file(scheme, remaining, base, vfn);
            }
            if stype.is_special() {
                if let Some(base) = base {
                    if base.scheme == scheme && !starts_with_two_slashes(remaining, stype) {
                        vfn(SyntaxViolation::ExpectedDoubleSlash);
                        return parse_relative(remaining, base, vfn);
                    }
                }
                return parse_with_authority(scheme, remaining, SchemeType::SpecialNotFile, vfn);
            }
            if starts_with_two_slashes(remaining, SchemeType::NotSpecial) {
                parse_with_authority(scheme, remaining, SchemeType::NotSpecial, vfn)
            } else if remaining.starts_with('/') {
                parse_path_only(scheme, remaining, vfn)
            } else {
                parse_opaque_path(scheme, remaining, vfn)
            }
        }
        None => {
            let base = match base {
                Some(base) => base,
                None if cleaned.is_empty() => return Err(ParseError::SchemeMissing),
                None => return Err(ParseError::RelativeUrlWithoutBase),
            };
            if matches!(base.path, Path::Opaque(_)) {
                if let Some(rest) = cleaned.strip_prefix('#') {
                    let mut url = base.clone();
                    url.fragment = Some(parse_fragment(rest, vfn));
                    return Ok(url);
                }
                return Err(ParseError::RelativeUrlWithNonRelativeBase);
            }
            parse_relative(&cleaned, base, vfn)
        }
    }
}

fn starts_with_two_slashes(input: &str, stype: SchemeType) -> bool {
    let bytes = input.as_bytes();
    bytes.len() >= 2 && is_slash(bytes[0] as char, stype) && is_slash(bytes[1] as char, stype)
}

/// `\` is only slash-equivalent for special schemes.
fn is_slash(c: char, stype: SchemeType) -> bool {
    c == '/' || (c == '\\' && stype.is_special())
}

/// <https://url.spec.whatwg.org/#scheme-start-state>
fn parse_scheme(input: &str) -> Option<(String, &str)> {
    let mut chars = input.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (i, c) in chars {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '+' | '-' | '.' => {}
            ':' => return Some((input[..i].to_ascii_lowercase(), &input[i + 1..])),
            _ => return None,
        }
    }
    None
}

fn trim_c0_and_space<'a>(input: &'a str, vfn: &mut Violation<'_>) -> &'a str {
    let is_c0_or_space = |c: char| c <= ' ';
    let trimmed = input.trim_matches(is_c0_or_space);
    if trimmed.len() != input.len() {
        vfn(SyntaxViolation::C0SpaceIgnored);
    }
    trimmed
}

fn strip_tab_and_newline(input: &str, vfn: &mut Violation<'_>) -> String {
    if input.contains(['\t', '\n', '\r']) {
        vfn(SyntaxViolation::TabOrNewlineIgnored);
    }
    input.chars().filter(|&c| c != '\t' && c != '\n' && c != '\r').collect()
}

/// Parse an absolute URL for a scheme that owns an authority (`//...`).
fn parse_with_authority(
    scheme: String,
    input: &str,
    stype: SchemeType,
    vfn: &mut Violation<'_>,
) -> Result<Url, ParseError> {
    let remaining = skip_slashes(input, stype, vfn);
    let (username, password, remaining) = parse_userinfo(remaining, vfn);
    let (host, port, remaining) = parse_host_and_port(remaining, &scheme, stype, vfn)?;
    let in_file_scheme = false;
    let (path, remaining) = parse_path_start(remaining, stype, in_file_scheme, vfn);
    let (query, fragment) = parse_query_and_fragment(remaining, stype, vfn);
    Ok(Url {
        scheme,
        username,
        password,
        host: Some(host),
        port,
        path: Path::List(path),
        query,
        fragment,
    })
}

fn parse_opaque_path(scheme: String, input: &str, vfn: &mut Violation<'_>) -> Result<Url, ParseError> {
    let mut opaque = String::new();
    let mut end = input.len();
    for (i, c) in input.char_indices() {
        match c {
            '?' | '#' => {
                end = i;
                break;
            }
            _ => {
                check_url_code_point(c, input, i, vfn);
                opaque.push_str(&utf8_percent_encode(&input[i..i + c.len_utf8()], C0_CONTROL).to_string());
            }
        }
    }
    let (query, fragment) = parse_query_and_fragment(&input[end..], SchemeType::NotSpecial, vfn);
    Ok(Url {
        scheme,
        username: String::new(),
        password: String::new(),
        host: None,
        port: None,
        path: Path::Opaque(opaque),
        query,
        fragment,
    })
}

/// Not-special scheme with a single leading `/` and no authority: a
/// hierarchical path with no host.
fn parse_path_only(scheme: String, input: &str, vfn: &mut Violation<'_>) -> Result<Url, ParseError> {
    let (path, remaining) = parse_path_start(input, SchemeType::NotSpecial, false, vfn);
    let (query, fragment) = parse_query_and_fragment(remaining, SchemeType::NotSpecial, vfn);
    Ok(Url {
        scheme,
        username: String::new(),
        password: String::new(),
        host: None,
        port: None,
        path: Path::List(path),
        query,
        fragment,
    })
}

fn parse_file(
    scheme: String,
    input: &str,
    base: Option<&Url>,
    vfn: &mut Violation<'_>,
) -> Result<Url, ParseError> {
    if let Some(base) = base {
        if base.scheme == "file" && !starts_with_two_slashes(input, SchemeType::File) {
            vfn(SyntaxViolation::ExpectedFileDoubleSlash);
            return parse_relative(input, base, vfn);
        }
    }

    let remaining = if starts_with_two_slashes(input, SchemeType::File) {
        skip_slashes(input, SchemeType::File, vfn)
    } else {
        input
    };

    let (host, remaining) = if remaining.len() >= 2
        && remaining.as_bytes()[0].is_ascii_alphabetic()
        && matches!(remaining.as_bytes()[1], b':' | b'|')
        && (remaining.len() == 2 || matches!(remaining.as_bytes()[2], b'/' | b'\\' | b'?' | b'#'))
    {
        (Host::Empty, remaining)
    } else {
        parse_file_host(remaining, vfn)?
    };

    let (path, remaining) = parse_path_start(remaining, SchemeType::File, true, vfn);
    let (query, fragment) = parse_query_and_fragment(remaining, SchemeType::File, vfn);
    Ok(Url {
        scheme,
        username: String::new(),
        password: String::new(),
        host: Some(host),
        port: None,
        path: Path::List(path),
        query,
        fragment,
    })
}

fn parse_file_host<'a>(input: &'a str, vfn: &mut Violation<'_>) -> Result<(Host, &'a str), ParseError> {
    let end = input
        .find(|c| matches!(c, '/' | '\\' | '?' | '#'))
        .unwrap_or(input.len());
    let host_input = &input[..end];
    let host = if host_input.is_empty() {
        Host::Empty
    } else {
        Host::parse(host_input, SchemeType::File).map_err(|e| {
            vfn(SyntaxViolation::NonUrlCodePoint);
            e
        })?
    };
    Ok((host, &input[end..]))
}

fn parse_relative(input: &str, base: &Url, vfn: &mut Violation<'_>) -> Result<Url, ParseError> {
    let in_file_scheme = base.scheme == "file";
    let stype = scheme_type(&base.scheme);

    if input.is_empty() {
        let mut url = base.clone();
        url.fragment = None;
        return Ok(url);
    }

    let mut chars = input.chars();
    let first = chars.next().unwrap();

    if is_slash(first, stype) {
        let second = chars.next();
        if second.map_or(false, |c| is_slash(c, stype)) {
            if in_file_scheme {
                let rest = &input[first.len_utf8() + second.unwrap().len_utf8()..];
                let (host, rest) = if rest.len() >= 2
                    && rest.as_bytes()[0].is_ascii_alphabetic()
                    && matches!(rest.as_bytes()[1], b':' | b'|')
                    && (rest.len() == 2 || matches!(rest.as_bytes()[2], b'/' | b'\\' | b'?' | b'#'))
                {
                    (Host::Empty, rest)
                } else {
                    parse_file_host(rest, vfn)?
                };
                let (path, rest) = parse_path_start(rest, SchemeType::File, true, vfn);
                let (query, fragment) = parse_query_and_fragment(rest, SchemeType::File, vfn);
                return Ok(Url {
                    scheme: base.scheme.clone(),
                    username: String::new(),
                    password: String::new(),
                    host: Some(host),
                    port: None,
                    path: Path::List(path),
                    query,
                    fragment,
                });
            }
            return parse_with_authority(base.scheme.clone(), input, stype, vfn);
        }
        let (path, rest) = parse_path_start(&input[first.len_utf8()..], stype, in_file_scheme, vfn);
        let (query, fragment) = parse_query_and_fragment(rest, stype, vfn);
        return Ok(Url {
            scheme: base.scheme.clone(),
            username: if in_file_scheme { String::new() } else { base.username.clone() },
            password: if in_file_scheme { String::new() } else { base.password.clone() },
            host: if in_file_scheme { Some(Host::Empty) } else { base.host.clone() },
            port: if in_file_scheme { None } else { base.port },
            path: Path::List(path),
            query,
            fragment,
        });
    }

    if first == '?' {
        let (query, fragment) = parse_query_and_fragment(input, stype, vfn);
        let mut url = base.clone();
        url.query = query;
        url.fragment = fragment;
        return Ok(url);
    }

    if first == '#' {
        let mut url = base.clone();
        url.fragment = Some(parse_fragment(&input[1..], vfn));
        return Ok(url);
    }

    let windows_drive_quirk = in_file_scheme
        && input.len() >= 2
        && input.as_bytes()[0].is_ascii_alphabetic()
        && matches!(input.as_bytes()[1], b':' | b'|')
        && (input.len() == 2 || matches!(input.as_bytes()[2], b'/' | b'\\' | b'?' | b'#'));

    let (path, rest) = if windows_drive_quirk {
        parse_path(Vec::new(), input, stype, true, vfn)
    } else {
        let mut initial = match &base.path {
            Path::List(segments) => segments.clone(),
            Path::Opaque(_) => Vec::new(),
        };
        initial.pop();
        parse_path(initial, input, stype, in_file_scheme, vfn)
    };
    let (query, fragment) = parse_query_and_fragment(rest, stype, vfn);
    Ok(Url {
        scheme: base.scheme.clone(),
        username: if windows_drive_quirk { String::new() } else { base.username.clone() },
        password: if windows_drive_quirk { String::new() } else { base.password.clone() },
        host: if windows_drive_quirk { Some(Host::Empty) } else { base.host.clone() },
        port: if windows_drive_quirk { None } else { base.port },
        path: Path::List(path),
        query,
        fragment,
    })
}

fn skip_slashes<'a>(input: &'a str, stype: SchemeType, vfn: &mut Violation<'_>) -> &'a str {
    let first_non_slash = input.find(|c| !is_slash(c, stype)).unwrap_or(input.len());
    if &input[..first_non_slash.min(2)] != "//" {
        vfn(SyntaxViolation::ExpectedDoubleSlash);
    }
    &input[first_non_slash..]
}

fn parse_userinfo<'a>(input: &'a str, vfn: &mut Violation<'_>) -> (String, String, &'a str) {
    let end = input
        .find(|c| matches!(c, '/' | '\\' | '?' | '#'))
        .unwrap_or(input.len());
    let scan_region = &input[..end];

    let Some(at) = scan_region.rfind('@') else {
        return (String::new(), String::new(), input);
    };
    vfn(SyntaxViolation::EmbeddedCredentials);

    let credentials = &scan_region[..at];
    let remaining = &input[at + 1..];
    let mut username = String::new();
    let mut password = String::new();
    match credentials.find(':') {
        Some(colon) => {
            for (i, c) in credentials[..colon].char_indices() {
                check_url_code_point(c, credentials, i, vfn);
                username.push_str(&utf8_percent_encode(&credentials[i..i + c.len_utf8()], USERINFO).to_string());
            }
            for (i, c) in credentials[colon + 1..].char_indices() {
                let abs = colon + 1 + i;
                check_url_code_point(c, credentials, abs, vfn);
                password.push_str(&utf8_percent_encode(&credentials[abs..abs + c.len_utf8()], USERINFO).to_string());
            }
        }
        None => {
            for (i, c) in credentials.char_indices() {
                check_url_code_point(c, credentials, i, vfn);
                username.push_str(&utf8_percent_encode(&credentials[i..i + c.len_utf8()], USERINFO).to_string());
            }
        }
    }
    (username, password, remaining)
}

fn parse_host_and_port<'a>(
    input: &'a str,
    scheme: &str,
    stype: SchemeType,
    vfn: &mut Violation<'_>,
) -> Result<(Host, Option<u16>, &'a str), ParseError> {
    let mut inside_brackets = false;
    let mut end = input.len();
    let mut colon_at = None;
    for (i, c) in input.char_indices() {
        match c {
            '[' => inside_brackets = true,
            ']' => inside_brackets = false,
            ':' if !inside_brackets => {
                colon_at = Some(i);
                end = i;
                break;
            }
            '/' | '?' | '#' => {
                end = i;
                break;
            }
            '\\' if stype.is_special() => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let host_input = &input[..end];
    let host = Host::parse(host_input, stype)?;
    if stype.is_special() && matches!(host, Host::Empty) {
        return Err(ParseError::HostMissing);
    }
    match colon_at {
        Some(colon) => {
            let (port, rest) = parse_port(&input[colon + 1..], scheme, vfn)?;
            Ok((host, port, rest))
        }
        None => Ok((host, None, &input[end..])),
    }
}

fn parse_port<'a>(
    input: &'a str,
    scheme: &str,
    vfn: &mut Violation<'_>,
) -> Result<(Option<u16>, &'a str), ParseError> {
    let end = input
        .find(|c| matches!(c, '/' | '\\' | '?' | '#'))
        .unwrap_or(input.len());
    let digits = &input[..end];
    if digits.is_empty() {
        return Ok((None, &input[end..]));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        let _ = vfn;
        return Err(ParseError::PortInvalid);
    }
    let value: u32 = digits.parse().map_err(|_| ParseError::PortOverflow)?;
    if value > u16::MAX as u32 {
        return Err(ParseError::PortOverflow);
    }
    let value = value as u16;
    let port = if Some(value) == default_port(scheme) { None } else { Some(value) };
    Ok((port, &input[end..]))
}

pub(crate) fn parse_path_start<'a>(
    input: &'a str,
    stype: SchemeType,
    in_file_scheme: bool,
    vfn: &mut Violation<'_>,
) -> (Vec<String>, &'a str) {
    let mut start = 0;
    if let Some(c) = input.chars().next() {
        if c == '/' {
            start = 1;
        } else if c == '\\' && stype.is_special() {
            vfn(SyntaxViolation::Backslash);
            start = 1;
        }
    }
    parse_path(Vec::new(), &input[start..], stype, in_file_scheme, vfn)
}

fn parse_path<'a>(
    base_path: Vec<String>,
    input: &'a str,
    stype: SchemeType,
    in_file_scheme: bool,
    vfn: &mut Violation<'_>,
) -> (Vec<String>, &'a str) {
    let mut path = base_path;
    let mut pos = 0usize;
    let bytes_len = input.len();
    loop {
        let mut segment = String::new();
        let mut ends_with_slash = false;
        let start = pos;
        let mut end = bytes_len;
        for (i, c) in input[start..].char_indices() {
            let i = start + i;
            match c {
                '/' => {
                    ends_with_slash = true;
                    end = i;
                    break;
                }
                '\\' if stype.is_special() => {
                    vfn(SyntaxViolation::Backslash);
                    ends_with_slash = true;
                    end = i;
                    break;
                }
                '?' | '#' => {
                    end = i;
                    break;
                }
                _ => {
                    check_url_code_point(c, input, i, vfn);
                    segment.push_str(&utf8_percent_encode(&input[i..i + c.len_utf8()], PATH).to_string());
                }
            }
        }
        push_path_segment(&mut path, &segment, in_file_scheme);
        pos = if ends_with_slash { end + 1 } else { end };
        if !ends_with_slash {
            return (path, &input[end..]);
        }
        if pos >= bytes_len {
            // Trailing slash: one more, empty, segment.
            push_path_segment(&mut path, "", in_file_scheme);
            return (path, &input[bytes_len..]);
        }
    }
}

fn parse_query_and_fragment<'a>(
    input: &'a str,
    stype: SchemeType,
    vfn: &mut Violation<'_>,
) -> (Option<String>, Option<String>) {
    if input.is_empty() {
        return (None, None);
    }
    match input.as_bytes()[0] {
        b'#' => (None, Some(parse_fragment(&input[1..], vfn))),
        b'?' => {
            let set = if stype.is_special() { SPECIAL_QUERY } else { QUERY };
            let end = input.find('#').unwrap_or(input.len());
            let mut query = String::new();
            for (i, c) in input[1..end].char_indices() {
                check_url_code_point(c, input, 1 + i, vfn);
                query.push_str(&utf8_percent_encode(&input[1 + i..1 + i + c.len_utf8()], set).to_string());
            }
            let fragment = if end < input.len() { Some(parse_fragment(&input[end + 1..], vfn)) } else { None };
            (Some(query), fragment)
        }
        _ => (None, None),
    }
}

fn parse_fragment(input: &str, vfn: &mut Violation<'_>) -> String {
    let mut fragment = String::new();
    for (i, c) in input.char_indices() {
        if c == '\0' {
            vfn(SyntaxViolation::NullInFragment);
        }
        check_url_code_point(c, input, i, vfn);
        fragment.push_str(&utf8_percent_encode(&input[i..i + c.len_utf8()], FRAGMENT).to_string());
    }
    fragment
}

fn check_url_code_point(c: char, input: &str, i: usize, vfn: &mut Violation<'_>) {
    if c == '%' {
        let rest = &input[i + 1..];
        let is_hex2 = rest.len() >= 2 && rest.as_bytes()[0].is_ascii_hexdigit() && rest.as_bytes()[1].is_ascii_hexdigit();
        if !is_hex2 {
            vfn(SyntaxViolation::PercentDecode);
        }
        return;
    }
    if !is_url_code_point(c) {
        vfn(SyntaxViolation::NonUrlCodePoint);
    }
}

fn is_url_code_point(c: char) -> bool {
    matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' |
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-' |
        '.' | '/' | ':' | ';' | '=' | '?' | '@' | '_' | '~' |
        '\u{00A0}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{10FFFD}'
    )
}
