use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::splitter::DomainParts;
use crate::types::Section;

/// Outcome of [`Extractor::parse`](crate::Extractor::parse).
///
/// Absent parts are `None`. IP literals keep their address in
/// [`full_host`](Self::full_host) with every part absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractResult {
    full_host: String,
    subdomain: Option<String>,
    hostname: Option<String>,
    suffix: Option<String>,
    section: Option<Section>,
    is_ip: bool,
}

impl ExtractResult {
    /// Result for input that has no usable host
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn ip(host: String) -> Self {
        Self {
            full_host: host,
            is_ip: true,
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(parts: DomainParts, section: Option<Section>) -> Self {
        let full_host = [&parts.subdomain, &parts.hostname, &parts.suffix]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(".");

        Self {
            full_host,
            subdomain: parts.subdomain,
            hostname: parts.hostname,
            section: parts.suffix.as_ref().and(section),
            suffix: parts.suffix,
            is_ip: false,
        }
    }

    pub fn subdomain(&self) -> Option<&str> {
        self.subdomain.as_deref()
    }

    /// Registrable label, the one left of the suffix
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Present parts joined with dots, or the address of an IP literal
    pub fn full_host(&self) -> &str {
        &self.full_host
    }

    /// `hostname.suffix` when both are present
    pub fn registrable_domain(&self) -> Option<String> {
        match (&self.hostname, &self.suffix) {
            (Some(hostname), Some(suffix)) => Some(format!("{}.{}", hostname, suffix)),
            _ => None,
        }
    }

    pub fn is_valid_domain(&self) -> bool {
        self.hostname.is_some() && self.suffix.is_some()
    }

    pub fn is_ip(&self) -> bool {
        self.is_ip
    }

    /// List section of the rule that produced the suffix; `None` for the
    /// unknown-suffix fallback or when there is no suffix
    pub fn section(&self) -> Option<Section> {
        self.section
    }

    /// Subdomain labels, left to right
    pub fn subdomains(&self) -> Vec<&str> {
        self.subdomain
            .as_deref()
            .map(|s| s.split('.').collect())
            .unwrap_or_default()
    }

    pub fn to_map(&self) -> BTreeMap<&'static str, Option<String>> {
        BTreeMap::from([
            ("subdomain", self.subdomain.clone()),
            ("hostname", self.hostname.clone()),
            ("suffix", self.suffix.clone()),
        ])
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for ExtractResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("subdomain", &self.subdomain)?;
        map.serialize_entry("hostname", &self.hostname)?;
        map.serialize_entry("suffix", &self.suffix)?;
        map.end()
    }
}

impl fmt::Display for ExtractResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_host)
    }
}
