//! TLD Extract - split hostnames into subdomain, domain and public suffix
//!
//! This library provides:
//! - Public Suffix List parsing (ICANN and PRIVATE sections, wildcards, exceptions)
//! - Suffix matching with configurable extraction policies
//! - Host normalization from URLs, authorities and bare hostnames
//! - RFC 3492 Punycode conversion for internationalized labels
//! - Optional auto-download of the official list
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tld_extract_r::{parse_rules, Extractor};
//!
//! let list = "
//! // ===BEGIN ICANN DOMAINS===
//! com
//! uk
//! co.uk
//! // ===END ICANN DOMAINS===
//! // ===BEGIN PRIVATE DOMAINS===
//! blogspot.com
//! // ===END PRIVATE DOMAINS===
//! ";
//!
//! let extractor = Extractor::new(Arc::new(parse_rules(list).unwrap()));
//!
//! let result = extractor.parse("https://forums.news.cnn.co.uk/path");
//! assert_eq!(result.subdomain(), Some("forums.news"));
//! assert_eq!(result.hostname(), Some("cnn"));
//! assert_eq!(result.suffix(), Some("co.uk"));
//! assert_eq!(result.registrable_domain().as_deref(), Some("cnn.co.uk"));
//! ```
//!
//! # Extraction Policy
//!
//! | Flag | Value | Description |
//! |------|-------|-------------|
//! | `ALLOW_ICANN` | 2 | Use rules from the ICANN section |
//! | `ALLOW_PRIVATE` | 4 | Use rules from the PRIVATE section |
//! | `ALLOW_NOT_EXISTING_SUFFIXES` | 8 | Treat the last label as suffix when no rule matches |
//!
//! The default policy enables all three.

pub mod error;
pub mod extract;
pub mod matcher;
pub mod normalizer;
pub mod parser;
pub mod punycode;
pub mod result;
pub mod rules;
pub mod splitter;
pub mod types;

// Re-export commonly used items
pub use error::{ExtractError, LoadErrorKind, Result};
pub use extract::{Extractor, ExtractorBuilder, ExtractorOptions};
pub use matcher::{SuffixLookup, SuffixMatcher};
pub use parser::{parse_rules, parse_rules_from_file};
pub use punycode::{decode_domain, encode_domain, to_ascii, to_unicode};
pub use result::ExtractResult;
#[cfg(feature = "download")]
pub use rules::{AutoRuleLoader, DEFAULT_LIST_URL};
pub use rules::{
    FileRuleLoader, MemoryRuleLoader, NilRuleLoader, Rule, RuleLoader, RuleSet,
    DEFAULT_UPDATE_INTERVAL,
};
pub use splitter::DomainParts;
pub use types::{ExtractionPolicy, MatchResult, RuleKind, Section};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_full_workflow() {
        let list = r#"
// ===BEGIN ICANN DOMAINS===
com
jp
*.kobe.jp
!city.kobe.jp
// ===END ICANN DOMAINS===

// ===BEGIN PRIVATE DOMAINS===
blogspot.com
// ===END PRIVATE DOMAINS===
"#;

        // Parse rules
        let rules = parse_rules(list).unwrap();
        assert_eq!(rules.len(), 5);
        rules.verify().unwrap();

        let extractor = Extractor::new(Arc::new(rules));

        // Exact rule
        let r = extractor.parse("www.example.com");
        assert_eq!(r.registrable_domain().as_deref(), Some("example.com"));
        assert_eq!(r.section(), Some(Section::Icann));

        // Private rule
        let r = extractor.parse("foo.blogspot.com");
        assert_eq!(r.suffix(), Some("blogspot.com"));
        assert_eq!(r.section(), Some(Section::Private));

        // Wildcard and exception
        assert_eq!(extractor.parse("a.b.kobe.jp").suffix(), Some("b.kobe.jp"));
        assert_eq!(extractor.parse("www.city.kobe.jp").suffix(), Some("kobe.jp"));

        // Unknown suffix fallback
        let r = extractor.parse("a.b.example.example");
        assert_eq!(r.registrable_domain().as_deref(), Some("example.example"));
        assert_eq!(r.section(), None);

        // IP literal
        let r = extractor.parse("[::1]:8080");
        assert!(r.is_ip());
        assert_eq!(r.full_host(), "::1");

        // Punycode helpers
        assert_eq!(to_ascii("bücher.com").unwrap(), "xn--bcher-kva.com");
        assert_eq!(to_unicode("xn--bcher-kva.com").unwrap(), "bücher.com");
    }
}
