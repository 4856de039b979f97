use std::fmt;
use std::ops::BitOr;

use crate::error::{ExtractError, Result};

/// Public Suffix List section a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Icann,
    Private,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Icann => "ICANN",
            Section::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a suffix rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// "co.uk" matches exactly that suffix
    Exact,
    /// "*.mm" matches any single label followed by "mm"
    Wildcard,
    /// "!www.ck" carves "ck" back out of "*.ck"
    Exception,
}

/// Set of extraction flags controlling which rules the matcher may use.
///
/// Flags combine with `|`:
///
/// ```
/// use tld_extract_r::ExtractionPolicy;
///
/// let policy = ExtractionPolicy::ALLOW_ICANN | ExtractionPolicy::ALLOW_NOT_EXISTING_SUFFIXES;
/// assert!(policy.allows_icann());
/// assert!(!policy.allows_private());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtractionPolicy(u32);

impl ExtractionPolicy {
    /// Consult the ICANN section of the list
    pub const ALLOW_ICANN: Self = Self(2);
    /// Consult the PRIVATE section of the list
    pub const ALLOW_PRIVATE: Self = Self(4);
    /// Use the rightmost label as suffix when no rule matches
    pub const ALLOW_NOT_EXISTING_SUFFIXES: Self = Self(8);

    const ALL_BITS: u32 = 2 | 4 | 8;

    /// Build a policy from raw flag bits.
    ///
    /// Fails with `InvalidPolicy` when no flag is set or when a bit outside
    /// the defined flags is present.
    pub fn from_bits(bits: u32) -> Result<Self> {
        if bits == 0 || bits & !Self::ALL_BITS != 0 {
            return Err(ExtractError::InvalidPolicy(bits));
        }
        Ok(Self(bits))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn allows_icann(&self) -> bool {
        self.contains(Self::ALLOW_ICANN)
    }

    pub fn allows_private(&self) -> bool {
        self.contains(Self::ALLOW_PRIVATE)
    }

    pub fn allows_not_existing_suffixes(&self) -> bool {
        self.contains(Self::ALLOW_NOT_EXISTING_SUFFIXES)
    }

    /// Sections to consult, ICANN first
    pub fn sections(&self) -> impl Iterator<Item = Section> {
        let icann = self.allows_icann().then_some(Section::Icann);
        let private = self.allows_private().then_some(Section::Private);
        icann.into_iter().chain(private)
    }
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self(Self::ALL_BITS)
    }
}

impl BitOr for ExtractionPolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::with_capacity(3);
        if self.allows_icann() {
            names.push("ALLOW_ICANN");
        }
        if self.allows_private() {
            names.push("ALLOW_PRIVATE");
        }
        if self.allows_not_existing_suffixes() {
            names.push("ALLOW_NOT_EXISTING_SUFFIXES");
        }
        write!(f, "ExtractionPolicy({})", names.join(" | "))
    }
}

/// Outcome of suffix matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// Number of trailing labels forming the public suffix (0 = none)
    pub labels: usize,
    /// Section of the rule that produced the suffix
    pub section: Option<Section>,
    /// Suffix comes from the unknown-suffix fallback rather than a list rule
    pub from_fallback: bool,
}

impl MatchResult {
    /// No suffix matched
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_rule(labels: usize, section: Section) -> Self {
        Self {
            labels,
            section: Some(section),
            from_fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            labels: 1,
            section: None,
            from_fallback: true,
        }
    }

    pub fn is_none(&self) -> bool {
        self.labels == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_enables_all_flags() {
        let policy = ExtractionPolicy::default();
        assert!(policy.allows_icann());
        assert!(policy.allows_private());
        assert!(policy.allows_not_existing_suffixes());
        assert_eq!(policy.bits(), 14);
    }

    #[test]
    fn test_policy_from_bits_accepts_every_combination() {
        for bits in [2, 4, 8, 6, 10, 12, 14] {
            assert!(ExtractionPolicy::from_bits(bits).is_ok(), "bits {}", bits);
        }
    }

    #[test]
    fn test_policy_from_bits_rejects_invalid() {
        for bits in [0, 1, 3, 16, 15, 0xffff_ffff] {
            match ExtractionPolicy::from_bits(bits) {
                Err(ExtractError::InvalidPolicy(b)) => assert_eq!(b, bits),
                other => panic!("expected InvalidPolicy for {}, got {:?}", bits, other),
            }
        }
    }

    #[test]
    fn test_policy_sections_order() {
        let both = ExtractionPolicy::ALLOW_PRIVATE | ExtractionPolicy::ALLOW_ICANN;
        let sections: Vec<_> = both.sections().collect();
        assert_eq!(sections, vec![Section::Icann, Section::Private]);

        let fallback_only = ExtractionPolicy::ALLOW_NOT_EXISTING_SUFFIXES;
        assert_eq!(fallback_only.sections().count(), 0);
    }

    #[test]
    fn test_policy_debug_lists_flags() {
        let policy = ExtractionPolicy::ALLOW_ICANN | ExtractionPolicy::ALLOW_NOT_EXISTING_SUFFIXES;
        assert_eq!(
            format!("{:?}", policy),
            "ExtractionPolicy(ALLOW_ICANN | ALLOW_NOT_EXISTING_SUFFIXES)"
        );
    }

    #[test]
    fn test_match_result_constructors() {
        assert!(MatchResult::none().is_none());
        let m = MatchResult::from_rule(2, Section::Private);
        assert_eq!(m.labels, 2);
        assert_eq!(m.section, Some(Section::Private));
        assert!(!m.from_fallback);
        let f = MatchResult::fallback();
        assert_eq!(f.labels, 1);
        assert!(f.from_fallback);
    }
}
