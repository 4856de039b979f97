mod suffix;

pub use suffix::SuffixMatcher;

use std::sync::Arc;

use crate::types::{RuleKind, Section};

/// Rule storage the suffix matcher queries
pub trait SuffixLookup: Send + Sync {
    /// Find the rule of `section` matching `suffix`, the ACE lower-cased
    /// trailing labels of a host joined with dots.
    fn lookup(&self, section: Section, suffix: &str) -> Option<RuleKind>;
}

impl<L: SuffixLookup + ?Sized> SuffixLookup for &L {
    fn lookup(&self, section: Section, suffix: &str) -> Option<RuleKind> {
        (**self).lookup(section, suffix)
    }
}

impl<L: SuffixLookup + ?Sized> SuffixLookup for Arc<L> {
    fn lookup(&self, section: Section, suffix: &str) -> Option<RuleKind> {
        (**self).lookup(section, suffix)
    }
}
