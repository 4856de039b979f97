//! Host extraction from raw input.
//!
//! Turns anything from a bare hostname to a full URL into the host part,
//! lower-cased, and flags inputs that look like IP literals.

use std::net::Ipv6Addr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ExtractError, Result};
use crate::punycode::{self, MAX_DOMAIN_LENGTH};

/// Leading `scheme://` or scheme-relative `//`
static SCHEME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z][a-z0-9+\-.]*:)?//").expect("SCHEME_PATTERN: hardcoded regex is invalid")
});

/// Dotted quad shape; octet ranges are not checked
static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$")
        .expect("IPV4_PATTERN: hardcoded regex is invalid")
});

/// Host part of an input, ready for label splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedHost {
    pub host: String,
    pub is_likely_ip: bool,
}

impl NormalizedHost {
    fn ip(host: &str) -> Self {
        Self {
            host: host.to_string(),
            is_likely_ip: true,
        }
    }
}

/// Reduce a URL, authority or hostname to its lower-cased host.
///
/// ```
/// use tld_extract_r::normalizer::normalize;
///
/// let host = normalize("HTTPS://user@WWW.Example.com:8443/path?q=1");
/// assert_eq!(host.host, "www.example.com");
/// assert!(!host.is_likely_ip);
/// ```
pub fn normalize(raw: &str) -> NormalizedHost {
    let input = raw.trim().to_lowercase();

    let rest = SCHEME_PATTERN
        .find(&input)
        .map_or(input.as_str(), |m| &input[m.end()..]);
    let rest = rest.split('/').next().unwrap_or(rest);
    let authority = strip_query_and_fragment(rest);
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);

    if let Some(literal) = host_port.strip_prefix('[') {
        let host = literal.find(']').map_or(literal, |end| &literal[..end]);
        return NormalizedHost::ip(host);
    }

    if is_bare_ipv6(host_port) {
        return NormalizedHost::ip(host_port);
    }

    let host = strip_port(host_port);
    let address = host.strip_suffix('.').unwrap_or(host);
    if IPV4_PATTERN.is_match(address) {
        return NormalizedHost::ip(address);
    }

    NormalizedHost {
        host: host.to_string(),
        is_likely_ip: false,
    }
}

/// Cut `input` at the first `?` or `#`
pub fn strip_query_and_fragment(input: &str) -> &str {
    input
        .find(&['?', '#'][..])
        .map_or(input, |pos| &input[..pos])
}

fn is_bare_ipv6(host: &str) -> bool {
    if host.matches(':').count() < 2 {
        return false;
    }
    let address = host.split_once('%').map_or(host, |(address, _zone)| address);
    address.parse::<Ipv6Addr>().is_ok()
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// Validated labels of a host, kept both as given and in ACE form.
#[derive(Debug, Clone)]
pub struct HostLabels<'a> {
    labels: Vec<&'a str>,
    ascii: String,
}

impl<'a> HostLabels<'a> {
    /// Split `host` on dots, dropping one trailing dot.
    ///
    /// Every label must encode to 1..=63 ACE octets and the ACE domain must
    /// stay within 255 octets. A `:` left over from an unparseable port
    /// rejects the host.
    pub fn parse(host: &'a str) -> Result<Self> {
        if host.contains(':') {
            return Err(ExtractError::InvalidHost(host.to_string()));
        }

        let host = host.strip_suffix('.').unwrap_or(host);
        let labels: Vec<&str> = host.split('.').collect();

        let mut ascii = String::with_capacity(host.len());
        for (i, label) in labels.iter().enumerate() {
            if i > 0 {
                ascii.push('.');
            }
            ascii.push_str(&punycode::encode(label)?);
        }

        if ascii.len() > MAX_DOMAIN_LENGTH {
            return Err(ExtractError::DomainOutOfRange {
                length: ascii.len(),
            });
        }

        Ok(Self { labels, ascii })
    }

    /// Labels in the caller's form (Unicode or ACE)
    pub fn labels(&self) -> &[&'a str] {
        &self.labels
    }

    /// The host in ACE form
    pub fn ascii(&self) -> &str {
        &self.ascii
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
