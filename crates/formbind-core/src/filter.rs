//! Allow/deny filtering of incoming field names
//!
//! Patterns are simple globs: `xxx*` matches by prefix, `*xxx` by suffix,
//! `*xxx*` by substring, and anything else must match exactly. A deny match
//! always wins over an allow match.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Match a single pattern against a field name
pub fn simple_match(pattern: &str, field: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    let leading = pattern.starts_with('*');
    let trailing = pattern.len() > 1 && pattern.ends_with('*');
    match (leading, trailing) {
        (true, true) => field.contains(&pattern[1..pattern.len() - 1]),
        (true, false) => field.ends_with(&pattern[1..]),
        (false, true) => field.starts_with(&pattern[..pattern.len() - 1]),
        (false, false) => pattern == field,
    }
}

/// Match a field against any of the patterns
pub fn matches_any<S: AsRef<str>>(patterns: &[S], field: &str) -> bool {
    patterns.iter().any(|p| simple_match(p.as_ref(), field))
}

/// Decide whether `field` may be bound.
///
/// The field passes when there are no allow patterns or one of them matches,
/// and no deny pattern matches.
pub fn is_allowed<S: AsRef<str>>(field: &str, allow_patterns: &[S], deny_patterns: &[S]) -> bool {
    (allow_patterns.is_empty() || matches_any(allow_patterns, field))
        && (deny_patterns.is_empty() || !matches_any(deny_patterns, field))
}

/// Allow/deny pattern sets held by a binder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    #[serde(default, rename = "allowed_fields")]
    pub allowed: Vec<String>,
    #[serde(default, rename = "disallowed_fields")]
    pub disallowed: Vec<String>,
}

impl FieldFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allow patterns; entries are canonicalized paths or globs
    pub fn set_allowed<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = normalize_patterns(patterns);
    }

    /// Replace the deny patterns
    pub fn set_disallowed<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallowed = normalize_patterns(patterns);
    }

    pub fn is_allowed(&self, field: &str) -> bool {
        is_allowed(field, &self.allowed, &self.disallowed)
    }

    /// No patterns configured, every field passes
    pub fn is_open(&self) -> bool {
        self.allowed.is_empty() && self.disallowed.is_empty()
    }
}

fn normalize_patterns<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    patterns
        .into_iter()
        .map(|p| crate::path::canonicalize(p.into().trim()))
        .filter(|p| !p.is_empty())
        .collect()
}
