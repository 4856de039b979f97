use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{ExtractError, LoadErrorKind, Result};
use crate::rules::{Rule, RuleSet};
use crate::types::Section;

/// Section marker lines, e.g. `// ===BEGIN PRIVATE DOMAINS===`
static SECTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^//\s*===\s*(BEGIN|END)\s+(ICANN|PRIVATE)\s+DOMAINS\s*===")
        .expect("SECTION_PATTERN: hardcoded regex is invalid")
});

/// Shape of a rule token: optional `!` or `*.` marker followed by labels,
/// or the bare `*` rule
static RULE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:!|\*\.)?[^\s!*]+|\*)$").expect("RULE_PATTERN: hardcoded regex is invalid")
});

/// Parse Public Suffix List text.
///
/// Rules before any section marker are ICANN rules. Only the first
/// whitespace-separated token of a line is read. Exception rules without a
/// covering wildcard are logged and kept; call [`RuleSet::verify`] to reject
/// them.
pub fn parse_rules(text: &str) -> Result<RuleSet> {
    let mut rules = RuleSet::new();
    let mut section = Section::Icann;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        if let Some(captures) = SECTION_PATTERN.captures(line) {
            if &captures[1] == "BEGIN" {
                section = match &captures[2] {
                    "PRIVATE" => Section::Private,
                    _ => Section::Icann,
                };
                tracing::debug!(line = line_num, section = %section, "Entering suffix list section");
            }
            continue;
        }

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let rule = parse_single_rule(token, section, line_num)?;
        rules.insert(rule);
    }

    for violation in rules.violations() {
        tracing::warn!(%violation, "Suffix list invariant violated");
    }

    tracing::debug!(
        icann = rules.section_len(Section::Icann),
        private = rules.section_len(Section::Private),
        "Parsed suffix list"
    );

    Ok(rules)
}

/// Parse a Public Suffix List file.
pub fn parse_rules_from_file(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        ExtractError::load(
            LoadErrorKind::FileError,
            format!("Failed to read suffix list '{}': {}", path.display(), e),
        )
    })?;
    parse_rules(&text)
}

fn parse_single_rule(token: &str, section: Section, line_num: usize) -> Result<Rule> {
    if !RULE_PATTERN.is_match(token) {
        return Err(ExtractError::ParseErrorAtLine {
            line: line_num,
            message: format!("Invalid rule format: {}", token),
        });
    }

    Rule::parse(token, section).map_err(|e| ExtractError::ParseErrorAtLine {
        line: line_num,
        message: e.to_string(),
    })
}
