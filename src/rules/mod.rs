//! Indexed Public Suffix List rules.
//!
//! Rules are stored per section in hash sets keyed by their ACE form, so a
//! candidate suffix is checked with at most three O(1) lookups per section.

mod loader;

#[cfg(feature = "download")]
mod auto_loader;

#[cfg(feature = "download")]
pub use auto_loader::{AutoRuleLoader, DEFAULT_LIST_FILENAME, DEFAULT_LIST_URL};
pub use loader::{
    FileRuleLoader, MemoryRuleLoader, NilRuleLoader, RuleLoader, DEFAULT_UPDATE_INTERVAL,
};

use std::collections::HashSet;
use std::fmt;

use crate::error::{ExtractError, Result};
use crate::matcher::SuffixLookup;
use crate::punycode;
use crate::types::{RuleKind, Section};

/// A single suffix list rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// ACE labels without the `!` / `*.` marker ("" for the bare `*` rule)
    pattern: String,
    kind: RuleKind,
    section: Section,
}

impl Rule {
    /// Create a rule from its labels (without marker).
    ///
    /// Unicode labels are converted to their ACE form.
    pub fn new(pattern: &str, kind: RuleKind, section: Section) -> Result<Self> {
        if pattern.contains(&['*', '!'][..]) || pattern.chars().any(char::is_whitespace) {
            return Err(ExtractError::InvalidRule(format!(
                "unexpected character in '{}'",
                pattern
            )));
        }

        if pattern.is_empty() {
            if kind != RuleKind::Wildcard {
                return Err(ExtractError::InvalidRule("empty rule".to_string()));
            }
            return Ok(Self {
                pattern: String::new(),
                kind,
                section,
            });
        }

        let pattern = punycode::encode_domain(pattern)
            .map_err(|e| ExtractError::InvalidRule(format!("'{}': {}", pattern, e)))?;

        Ok(Self {
            pattern,
            kind,
            section,
        })
    }

    /// Parse a rule in list notation: `co.uk`, `*.mm`, `*` or `!www.ck`
    pub fn parse(text: &str, section: Section) -> Result<Self> {
        if text == "*" {
            return Self::new("", RuleKind::Wildcard, section);
        }
        if let Some(pattern) = text.strip_prefix('!') {
            return Self::new(pattern, RuleKind::Exception, section);
        }
        if let Some(pattern) = text.strip_prefix("*.") {
            return Self::new(pattern, RuleKind::Wildcard, section);
        }
        Self::new(text, RuleKind::Exact, section)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Number of labels the rule spans, the wildcard label included
    pub fn label_count(&self) -> usize {
        let fixed = if self.pattern.is_empty() {
            0
        } else {
            self.pattern.split('.').count()
        };
        match self.kind {
            RuleKind::Wildcard => fixed + 1,
            RuleKind::Exact | RuleKind::Exception => fixed,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RuleKind::Exact => f.write_str(&self.pattern),
            RuleKind::Exception => write!(f, "!{}", self.pattern),
            RuleKind::Wildcard if self.pattern.is_empty() => f.write_str("*"),
            RuleKind::Wildcard => write!(f, "*.{}", self.pattern),
        }
    }
}

/// Rules of one list section
#[derive(Debug, Clone, Default)]
struct SectionRules {
    exact: HashSet<String>,
    /// Keyed by the labels after "*."
    wildcard: HashSet<String>,
    /// Keyed by the labels after "!"
    exception: HashSet<String>,
}

impl SectionRules {
    fn set(&self, kind: RuleKind) -> &HashSet<String> {
        match kind {
            RuleKind::Exact => &self.exact,
            RuleKind::Wildcard => &self.wildcard,
            RuleKind::Exception => &self.exception,
        }
    }

    fn set_mut(&mut self, kind: RuleKind) -> &mut HashSet<String> {
        match kind {
            RuleKind::Exact => &mut self.exact,
            RuleKind::Wildcard => &mut self.wildcard,
            RuleKind::Exception => &mut self.exception,
        }
    }

    fn lookup(&self, suffix: &str) -> Option<RuleKind> {
        if self.exception.contains(suffix) {
            return Some(RuleKind::Exception);
        }
        if self.exact.contains(suffix) {
            return Some(RuleKind::Exact);
        }
        // "*" occupies the leftmost label, the rest must match literally
        let parent = suffix.split_once('.').map_or("", |(_, rest)| rest);
        if self.wildcard.contains(parent) {
            return Some(RuleKind::Wildcard);
        }
        None
    }

    fn len(&self) -> usize {
        self.exact.len() + self.wildcard.len() + self.exception.len()
    }

    fn violations(&self, section: Section, out: &mut Vec<String>) {
        for exception in &self.exception {
            let Some((_, parent)) = exception.split_once('.') else {
                out.push(format!(
                    "{}: exception !{} has no parent suffix",
                    section, exception
                ));
                continue;
            };

            if !self.wildcard.contains(parent) {
                out.push(format!(
                    "{}: exception !{} is not covered by wildcard *.{}",
                    section, exception, parent
                ));
            }

            let mut rest = parent;
            while let Some((_, shorter)) = rest.split_once('.') {
                if self.exception.contains(rest) {
                    out.push(format!(
                        "{}: exception !{} is nested under exception !{}",
                        section, exception, rest
                    ));
                }
                rest = shorter;
            }
            if self.exception.contains(rest) {
                out.push(format!(
                    "{}: exception !{} is nested under exception !{}",
                    section, exception, rest
                ));
            }
        }
    }
}

/// Parsed Public Suffix List, split into ICANN and PRIVATE sections.
///
/// Read-only once built; share it between extractors with `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    icann: SectionRules,
    private: SectionRules,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut set = Self::new();
        for rule in rules {
            set.insert(rule);
        }
        set
    }

    fn section(&self, section: Section) -> &SectionRules {
        match section {
            Section::Icann => &self.icann,
            Section::Private => &self.private,
        }
    }

    /// Add a rule. Returns false if it was already present.
    pub fn insert(&mut self, rule: Rule) -> bool {
        let section = match rule.section {
            Section::Icann => &mut self.icann,
            Section::Private => &mut self.private,
        };
        section.set_mut(rule.kind).insert(rule.pattern)
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.section(rule.section).set(rule.kind).contains(&rule.pattern)
    }

    /// Find the rule of `section` matching `suffix`, an ACE lower-cased
    /// dotted suffix. Exception beats exact beats wildcard.
    pub fn lookup(&self, section: Section, suffix: &str) -> Option<RuleKind> {
        self.section(section).lookup(suffix)
    }

    pub fn len(&self) -> usize {
        self.icann.len() + self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn section_len(&self, section: Section) -> usize {
        self.section(section).len()
    }

    /// Iterate over all rules, in no particular order
    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        [Section::Icann, Section::Private]
            .into_iter()
            .flat_map(move |section| {
                [RuleKind::Exact, RuleKind::Wildcard, RuleKind::Exception]
                    .into_iter()
                    .flat_map(move |kind| {
                        self.section(section).set(kind).iter().map(move |pattern| Rule {
                            pattern: pattern.clone(),
                            kind,
                            section,
                        })
                    })
            })
    }

    /// Describe every exception rule that breaks the one wildcard/exception
    /// pair per subtree assumption: an exception needs a covering wildcard in
    /// its own section and must not sit under another exception.
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.icann.violations(Section::Icann, &mut out);
        self.private.violations(Section::Private, &mut out);
        out.sort();
        out
    }

    /// Fail with `InconsistentRules` on the first invariant violation
    pub fn verify(&self) -> Result<()> {
        match self.violations().into_iter().next() {
            Some(violation) => Err(ExtractError::InconsistentRules(violation)),
            None => Ok(()),
        }
    }
}

impl SuffixLookup for RuleSet {
    fn lookup(&self, section: Section, suffix: &str) -> Option<RuleKind> {
        RuleSet::lookup(self, section, suffix)
    }
}
