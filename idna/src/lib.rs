// Copyright 2013-2014 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! IDNA functions to convert domain names to and from Punycode,
//! as used by the [URL Standard](https://url.spec.whatwg.org/#idna).

mod punycode;
mod uts46;

pub use crate::uts46::{Config, Errors};

/// The default IDNA processing, as used by the URL parser: convert a
/// (possibly Unicode) domain name to its ASCII, Punycode-encoded form.
///
/// This is a convenience wrapper around [`Config::default().to_ascii(domain)`][Config::to_ascii].
pub fn domain_to_ascii(domain: &str) -> Result<String, Errors> {
    Config::default().to_ascii(domain)
}

/// Like [`domain_to_ascii`], but with
/// [`verify_dns_length`](Config::verify_dns_length) turned on, as used for
/// special-scheme hosts.
pub fn domain_to_ascii_strict(domain: &str) -> Result<String, Errors> {
    Config::default().verify_dns_length(true).to_ascii(domain)
}

/// Convert a Punycode-encoded domain name back to Unicode.
///
/// Returns the best-effort Unicode string together with the processing
/// result: callers that only care about display can ignore the `Result` and
/// use the string unconditionally, matching the WHATWG algorithm's "errors
/// do not stop processing" behavior.
pub fn domain_to_unicode(domain: &str) -> (String, Result<(), Errors>) {
    Config::default().to_unicode(domain)
}
