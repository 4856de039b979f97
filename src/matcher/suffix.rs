use crate::types::{ExtractionPolicy, MatchResult, RuleKind, Section};

use super::SuffixLookup;

/// Finds the public suffix of a host under an extraction policy.
///
/// Candidates are checked from the rightmost label inward. The longest
/// exception rule wins outright and yields one label less than it spans.
/// Otherwise the longest exact or wildcard match wins, with ICANN ahead of
/// PRIVATE for equal lengths.
#[derive(Debug, Clone)]
pub struct SuffixMatcher<L> {
    rules: L,
    policy: ExtractionPolicy,
}

impl<L: SuffixLookup> SuffixMatcher<L> {
    pub fn new(rules: L, policy: ExtractionPolicy) -> Self {
        Self { rules, policy }
    }

    pub fn rules(&self) -> &L {
        &self.rules
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    /// Match `host`, which must be ACE, lower-cased and free of empty labels.
    pub fn find(&self, host: &str) -> MatchResult {
        if host.is_empty() {
            return MatchResult::none();
        }

        let mut longest: Option<(usize, Section)> = None;
        let mut exception: Option<(usize, Section)> = None;
        let mut label_count = 0;

        for (labels, suffix) in trailing_suffixes(host) {
            label_count = labels;
            for section in self.policy.sections() {
                match self.rules.lookup(section, suffix) {
                    Some(RuleKind::Exception) => {
                        if exception.map_or(true, |(k, _)| labels > k) {
                            exception = Some((labels, section));
                        }
                    }
                    Some(RuleKind::Exact | RuleKind::Wildcard) => {
                        if longest.map_or(true, |(k, _)| labels > k) {
                            longest = Some((labels, section));
                        }
                    }
                    None => {}
                }
            }
        }

        let result = match (exception, longest) {
            (Some((k, section)), _) if k > 1 => MatchResult::from_rule(k - 1, section),
            (Some(_), _) => MatchResult::none(),
            (None, Some((k, section))) => MatchResult::from_rule(k, section),
            (None, None) if self.policy.allows_not_existing_suffixes() && label_count >= 2 => {
                MatchResult::fallback()
            }
            (None, None) => MatchResult::none(),
        };

        log::trace!("suffix match for {}: {:?}", host, result);
        result
    }
}

/// Yields `(k, suffix)` for the rightmost k labels, k = 1..=n
fn trailing_suffixes(host: &str) -> impl Iterator<Item = (usize, &str)> {
    host.rmatch_indices('.')
        .map(|(dot, _)| dot + 1)
        .chain(std::iter::once(0))
        .enumerate()
        .map(move |(i, start)| (i + 1, &host[start..]))
}
