use std::fmt;

use serde::Deserialize;

/// Classification of a request path.
///
/// Derived per request from the [`RuleSet`](crate::RuleSet); never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessClass {
    /// No identity required
    Public,
    /// Requires an identity whose role is the admin role
    AdminOnly,
    /// Requires any identity
    Protected,
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessClass::Public => write!(f, "public"),
            AccessClass::AdminOnly => write!(f, "admin-only"),
            AccessClass::Protected => write!(f, "protected"),
        }
    }
}

/// How a [`PathRule`] pattern is compared against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The path must equal the pattern
    Exact,
    /// The path must start with the pattern (plain string prefix, not
    /// segment-aware: `/admin` also matches `/administrator`)
    Prefix,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Prefix => write!(f, "prefix"),
        }
    }
}

/// One entry of the path classifier: `(match-kind, pattern, access class)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathRule {
    /// Comparison mode
    pub kind: MatchKind,
    /// Path pattern, always starting with `/`
    pub pattern: String,
    /// Class assigned to matching paths
    pub class: AccessClass,
}

impl PathRule {
    /// Rule matching exactly `pattern`.
    pub fn exact(pattern: impl Into<String>, class: AccessClass) -> Self {
        Self {
            kind: MatchKind::Exact,
            pattern: pattern.into(),
            class,
        }
    }

    /// Rule matching every path that starts with `pattern`.
    pub fn prefix(pattern: impl Into<String>, class: AccessClass) -> Self {
        Self {
            kind: MatchKind::Prefix,
            pattern: pattern.into(),
            class,
        }
    }

    /// Returns `true` if `path` falls under this rule.
    pub fn matches(&self, path: &str) -> bool {
        match self.kind {
            MatchKind::Exact => path == self.pattern,
            MatchKind::Prefix => path.starts_with(&self.pattern),
        }
    }

    /// Returns `true` if every path this rule can match is also matched by
    /// `earlier`, so that `self` can never fire when listed after it.
    pub(crate) fn is_shadowed_by(&self, earlier: &PathRule) -> bool {
        match (earlier.kind, self.kind) {
            (MatchKind::Exact, MatchKind::Exact) => earlier.pattern == self.pattern,
            (MatchKind::Exact, MatchKind::Prefix) => false,
            (MatchKind::Prefix, _) => self.pattern.starts_with(&earlier.pattern),
        }
    }
}

impl fmt::Display for PathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.kind, self.pattern, self.class)
    }
}
