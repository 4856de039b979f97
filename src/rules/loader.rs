use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::{ExtractError, LoadErrorKind, Result};
use crate::parser::{parse_rules, parse_rules_from_file};

use super::RuleSet;

/// Default refresh interval for downloaded lists: 7 days
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Source of a parsed suffix list
pub trait RuleLoader: Send + Sync {
    fn load_rules(&self) -> Result<Arc<RuleSet>>;
}

impl<L: RuleLoader + ?Sized> RuleLoader for Box<L> {
    fn load_rules(&self) -> Result<Arc<RuleSet>> {
        (**self).load_rules()
    }
}

/// Parse `path` and require at least one rule
pub(crate) fn load_list_file(path: &Path) -> Result<RuleSet> {
    let rules = parse_rules_from_file(path)?;
    if rules.is_empty() {
        return Err(ExtractError::load(
            LoadErrorKind::InvalidData,
            format!("Suffix list '{}' contains no rules", path.display()),
        ));
    }
    Ok(rules)
}

/// Loads the list from a local file, once
pub struct FileRuleLoader {
    path: PathBuf,
    rules: RwLock<Option<Arc<RuleSet>>>,
}

impl FileRuleLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            rules: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleLoader for FileRuleLoader {
    fn load_rules(&self) -> Result<Arc<RuleSet>> {
        if let Some(rules) = self.rules.read().as_ref() {
            return Ok(Arc::clone(rules));
        }

        let rules = Arc::new(load_list_file(&self.path)?);
        tracing::debug!(path = %self.path.display(), rules = rules.len(), "Loaded suffix list");
        *self.rules.write() = Some(Arc::clone(&rules));
        Ok(rules)
    }
}

/// Parses list text held in memory
pub struct MemoryRuleLoader {
    text: String,
}

impl MemoryRuleLoader {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl RuleLoader for MemoryRuleLoader {
    fn load_rules(&self) -> Result<Arc<RuleSet>> {
        Ok(Arc::new(parse_rules(&self.text)?))
    }
}

/// Loader with no source; always fails with `NotConfigured`
#[derive(Debug, Clone, Copy, Default)]
pub struct NilRuleLoader;

impl RuleLoader for NilRuleLoader {
    fn load_rules(&self) -> Result<Arc<RuleSet>> {
        Err(ExtractError::load(
            LoadErrorKind::NotConfigured,
            "No suffix list source configured",
        ))
    }
}
