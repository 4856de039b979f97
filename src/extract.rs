//! Extractor module.
//!
//! Splits hosts and URLs into subdomain, registrable label and public suffix
//! against a shared suffix list.

use std::path::Path;
use std::sync::Arc;

use crate::error::{ExtractError, Result};
use crate::matcher::SuffixMatcher;
use crate::normalizer::{normalize, HostLabels};
use crate::result::ExtractResult;
use crate::rules::{FileRuleLoader, RuleLoader, RuleSet};
use crate::splitter::split;
use crate::types::ExtractionPolicy;

/// Extractor options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractorOptions {
    /// Which list sections and fallbacks the matcher may use
    pub policy: ExtractionPolicy,
}

impl ExtractorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the policy from raw flag bits, rejecting invalid combinations.
    pub fn with_policy_bits(self, bits: u32) -> Result<Self> {
        Ok(self.with_policy(ExtractionPolicy::from_bits(bits)?))
    }
}

/// Splits hosts using a shared, read-only [`RuleSet`].
///
/// Cheap to clone; clones share the rules.
#[derive(Debug, Clone)]
pub struct Extractor {
    matcher: SuffixMatcher<Arc<RuleSet>>,
}

impl Extractor {
    /// Create an extractor with the default policy.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self::with_options(rules, ExtractorOptions::default())
    }

    pub fn with_options(rules: Arc<RuleSet>, options: ExtractorOptions) -> Self {
        Self {
            matcher: SuffixMatcher::new(rules, options.policy),
        }
    }

    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Create an extractor from a suffix list file.
    pub fn from_file(path: impl AsRef<Path>, options: ExtractorOptions) -> Result<Self> {
        Self::from_loader(&FileRuleLoader::new(path), options)
    }

    pub fn from_loader(loader: &dyn RuleLoader, options: ExtractorOptions) -> Result<Self> {
        Ok(Self::with_options(loader.load_rules()?, options))
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.matcher.policy()
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        self.matcher.rules()
    }

    /// Split a host or URL.
    ///
    /// Never fails: missing or malformed hosts give a result with every part
    /// absent, IP literals give a result flagged with `is_ip()`.
    pub fn parse<'a>(&self, input: impl Into<Option<&'a str>>) -> ExtractResult {
        let Some(input) = input.into() else {
            return ExtractResult::empty();
        };

        let normalized = normalize(input);
        if normalized.is_likely_ip {
            return ExtractResult::ip(normalized.host);
        }

        let labels = match HostLabels::parse(&normalized.host) {
            Ok(labels) => labels,
            Err(e) => {
                log::debug!("rejected host {:?}: {}", normalized.host, e);
                return ExtractResult::empty();
            }
        };

        let matched = self.matcher.find(labels.ascii());
        let parts = split(labels.labels(), &matched);
        ExtractResult::from_parts(parts, matched.section)
    }
}

/// Builder for [`Extractor`].
///
/// A rule source is required: either a parsed [`RuleSet`] or a [`RuleLoader`].
#[derive(Default)]
pub struct ExtractorBuilder {
    rules: Option<Arc<RuleSet>>,
    loader: Option<Box<dyn RuleLoader>>,
    options: ExtractorOptions,
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(mut self, rules: Arc<RuleSet>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Load rules at build time; ignored when rules were set directly.
    pub fn loader(mut self, loader: impl RuleLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn options(mut self, options: ExtractorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn policy(mut self, policy: ExtractionPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn build(self) -> Result<Extractor> {
        let rules = match (self.rules, self.loader) {
            (Some(rules), _) => rules,
            (None, Some(loader)) => loader.load_rules()?,
            (None, None) => {
                return Err(ExtractError::NotConfigured(
                    "extractor needs a rule set or a rule loader".to_string(),
                ))
            }
        };
        Ok(Extractor::with_options(rules, self.options))
    }
}
