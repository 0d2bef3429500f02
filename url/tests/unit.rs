// Copyright 2013-2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use url::{ParseError, Url};

#[test]
fn special_scheme_uppercased_host_default_port_dot_segments() {
    let url = Url::parse("HTTP://Example.COM:80/foo/./bar/../baz?q#f").unwrap();
    assert_eq!(url.scheme(), "http");
    assert_eq!(url.host_str(), Some("example.com".to_owned()));
    assert_eq!(url.port(), None);
    assert_eq!(url.port_or_known_default(), Some(80));
    assert_eq!(url.path(), "/foo/baz");
    assert_eq!(url.query(), Some("q"));
    assert_eq!(url.fragment(), Some("f"));
    assert_eq!(url.as_str(), "http://example.com/foo/baz?q#f");
}

#[test]
fn file_scheme_drive_letter_dot_dot_segment() {
    let url = Url::parse("file:///C:/x/../y").unwrap();
    assert!(!url.has_host());
    assert_eq!(url.path(), "/C:/y");
    assert_eq!(url.as_str(), "file:///C:/y");
}

#[test]
fn file_scheme_pipe_drive_letter_is_normalized() {
    let url = Url::parse("file:///C|/y").unwrap();
    assert_eq!(url.path(), "/C:/y");
}

#[test]
fn userinfo_ipv6_host_and_port() {
    let url = Url::parse("http://user:pa%20ss@[2001:db8::1]:8080/p").unwrap();
    assert_eq!(url.username(), "user");
    assert_eq!(url.password(), Some("pa%20ss"));
    assert_eq!(url.host_str(), Some("[2001:db8::1]".to_owned()));
    assert_eq!(url.port(), Some(8080));
    assert_eq!(url.as_str(), "http://user:pa%20ss@[2001:db8::1]:8080/p");
}

#[test]
fn relative_reference_joins_against_base() {
    let base = Url::parse("http://h/x/y").unwrap();
    let joined = base.join("a/b").unwrap();
    assert_eq!(joined.as_str(), "http://h/x/a/b");

    let root_relative = base.join("/z").unwrap();
    assert_eq!(root_relative.as_str(), "http://h/z");

    let fragment_only = base.join("#frag").unwrap();
    assert_eq!(fragment_only.path(), "/x/y");
    assert_eq!(fragment_only.fragment(), Some("frag"));

    let query_only = base.join("?q=1").unwrap();
    assert_eq!(query_only.path(), "/x/y");
    assert_eq!(query_only.query(), Some("q=1"));
}

#[test]
fn ipv4_hex_and_octal_parts_combine() {
    let url = Url::parse("http://0x7f.1/").unwrap();
    assert_eq!(url.host_str(), Some("127.0.0.1".to_owned()));
    assert_eq!(url.as_str(), "http://127.0.0.1/");
}

#[test]
fn space_in_host_is_rejected() {
    assert_eq!(Url::parse("http://exa mple.com/"), Err(ParseError::HostInvalid));
}

#[test]
fn empty_input_without_base_is_scheme_missing() {
    assert_eq!(Url::parse(""), Err(ParseError::SchemeMissing));
}

#[test]
fn control_and_space_only_input_is_scheme_missing() {
    assert_eq!(Url::parse("  \u{0}\t"), Err(ParseError::SchemeMissing));
}

#[test]
fn relative_reference_without_base_fails() {
    assert_eq!(Url::parse("a/b"), Err(ParseError::RelativeUrlWithoutBase));
}

#[test]
fn fragment_against_opaque_path_base_is_allowed() {
    let base = Url::parse("mailto:a@example.com").unwrap();
    let fragmented = base.join("#x").unwrap();
    assert_eq!(fragmented.as_str(), "mailto:a@example.com#x");
}

#[test]
fn non_fragment_relative_against_opaque_path_base_fails() {
    let base = Url::parse("mailto:a@example.com").unwrap();
    assert_eq!(base.join("b@example.com"), Err(ParseError::RelativeUrlWithNonRelativeBase));
}

#[test]
fn port_boundary_65535_ok_65536_overflows() {
    assert!(Url::parse("http://h:65535/").is_ok());
    assert_eq!(Url::parse("http://h:65536/"), Err(ParseError::PortOverflow));
}

#[test]
fn ipv4_overflow_and_too_many_parts() {
    assert_eq!(Url::parse("http://256.1.1.1/"), Err(ParseError::Ipv4Overflow));
    assert_eq!(Url::parse("http://1.1.1.1.1/"), Err(ParseError::Ipv4TooManyParts));
}

#[test]
fn ipv4_max_value_round_trips() {
    let url = Url::parse("http://0xFFFFFFFF/").unwrap();
    assert_eq!(url.host_str(), Some("255.255.255.255".to_owned()));
}

#[test]
fn ipv6_all_zero_compresses_to_double_colon() {
    let url = Url::parse("http://[::]/").unwrap();
    assert_eq!(url.host_str(), Some("[::]".to_owned()));
    assert_eq!(url.as_str(), "http://[::]/");
}

#[test]
fn setters_are_atomic_on_failure() {
    let mut url = Url::parse("file:///C:/y").unwrap();
    let before = url.as_str();
    assert!(url.set_username("bob").is_err());
    assert!(url.set_password("x").is_err());
    assert!(url.set_port(Some(1)).is_err());
    assert_eq!(url.as_str(), before);
}

#[test]
fn set_scheme_rejects_crossing_special_boundary() {
    let mut url = Url::parse("http://h/").unwrap();
    assert!(url.set_scheme("mailto").is_err());
    assert_eq!(url.scheme(), "http");
    assert!(url.set_scheme("https").is_ok());
    assert_eq!(url.scheme(), "https");
}

#[test]
fn set_host_round_trips() {
    let mut url = Url::parse("http://old.example/p").unwrap();
    url.set_host(Some("new.example")).unwrap();
    assert_eq!(url.as_str(), "http://new.example/p");
}

#[test]
fn set_path_reparses_dot_segments() {
    let mut url = Url::parse("http://h/old").unwrap();
    url.set_path("/a/./b/../c");
    assert_eq!(url.path(), "/a/c");
}

#[test]
fn already_percent_encoded_path_passes_through_unchanged() {
    let url = Url::parse("http://h/%25%2F%2525").unwrap();
    assert_eq!(url.path(), "/%25%2F%2525");
}

#[test]
fn query_pairs_decodes_form_urlencoded() {
    let url = Url::parse("http://h/?a=1&b=2+2&c=%26").unwrap();
    let pairs: Vec<(String, String)> =
        url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
    assert_eq!(
        pairs,
        vec![
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "2 2".to_owned()),
            ("c".to_owned(), "&".to_owned()),
        ]
    );
}

#[test]
fn non_special_scheme_keeps_opaque_path() {
    let url = Url::parse("mailto:user@example.com").unwrap();
    assert!(url.has_opaque_path());
    assert!(!url.has_host());
    assert_eq!(url.path(), "user@example.com");
    assert!(url.set_username("x").is_err());
}

#[test]
fn non_special_scheme_with_authority_keeps_hierarchical_path() {
    let url = Url::parse("custom://host/a/b").unwrap();
    assert!(!url.has_opaque_path());
    assert_eq!(url.path_segments().unwrap().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn non_special_scheme_single_slash_keeps_hierarchical_path_with_no_host() {
    let url = Url::parse("a:/foo").unwrap();
    assert!(!url.has_opaque_path());
    assert!(!url.has_host());
    assert_eq!(url.path(), "/foo");
    assert_eq!(url.as_str(), "a:/foo");
}

#[test]
fn backslash_is_tolerated_as_slash_for_special_schemes() {
    let url = Url::parse(r"http://host\a\b").unwrap();
    assert_eq!(url.path(), "/a/b");
}

#[test]
fn backslash_is_not_tolerated_as_slash_for_non_special_schemes() {
    let url = Url::parse(r"a:\\x").unwrap();
    assert!(url.has_opaque_path());
    assert_eq!(url.path(), r"\\x");
}

#[test]
fn input_round_trips_through_a_second_parse() {
    let once = Url::parse("HTTP://Example.COM:80/foo/./bar/../baz?q#f").unwrap().as_str();
    let twice = Url::parse(&once).unwrap().as_str();
    assert_eq!(once, twice);
}
