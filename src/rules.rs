//! The path classifier.
//!
//! A [`RuleSet`] is an ordered list of [`PathRule`]s evaluated top to
//! bottom; the first matching rule decides the [`AccessClass`]. Paths that
//! match nothing are [`AccessClass::Protected`], which keeps
//! classification total over all path strings.

use crate::error::{RuleDefect, RuleDefectKind};
use crate::policy::{AccessClass, PathRule};

/// Exact path of the login page.
pub const LOGIN_PATH: &str = "/login";
/// Prefix of the authentication callback endpoints.
pub const AUTH_CALLBACK_PREFIX: &str = "/api/auth";
/// Prefix of the admin area.
pub const ADMIN_PREFIX: &str = "/admin";

/// Immutable, ordered path classification rules.
///
/// Built once at startup (see [`RuleSet::builder`] and
/// [`GateConfig`](crate::GateConfig)) and shared read-only behind an `Arc`.
///
/// # Examples
///
/// ```
/// use request_gate::{AccessClass, RuleSet};
///
/// let rules = RuleSet::default();
/// assert_eq!(rules.classify("/login"), AccessClass::Public);
/// assert_eq!(rules.classify("/api/auth/callback"), AccessClass::Public);
/// assert_eq!(rules.classify("/admin/users"), AccessClass::AdminOnly);
/// assert_eq!(rules.classify("/profile"), AccessClass::Protected);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<PathRule>,
}

impl RuleSet {
    /// Starts an empty rule set builder.
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// Classifies `path`. The first matching rule wins; no match means
    /// [`AccessClass::Protected`].
    pub fn classify(&self, path: &str) -> AccessClass {
        self.matching_rule(path)
            .map(|rule| rule.class)
            .unwrap_or(AccessClass::Protected)
    }

    /// Returns the rule that decides `path`, if any.
    pub fn matching_rule(&self, path: &str) -> Option<&PathRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// Returns `true` if `path` is public.
    pub fn is_public(&self, path: &str) -> bool {
        self.classify(path) == AccessClass::Public
    }

    /// Returns `true` if `path` is admin-only.
    pub fn is_admin_only(&self, path: &str) -> bool {
        self.classify(path) == AccessClass::AdminOnly
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// Checks the rule set for configuration defects.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleDefect`] found: an empty or relative pattern,
    /// a rule that can never fire because an earlier rule matches every
    /// path it could match, or a non-public rule whose paths all lie inside
    /// a later public rule (it would take those paths out of the public set).
    pub fn validate(&self) -> Result<(), RuleDefect> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(RuleDefect::new(
                    RuleDefectKind::EmptyPattern,
                    index,
                    &rule.pattern,
                ));
            }
            if !rule.pattern.starts_with('/') {
                return Err(RuleDefect::new(
                    RuleDefectKind::NotAbsolute,
                    index,
                    &rule.pattern,
                ));
            }
            if let Some(by) = self.rules[..index]
                .iter()
                .position(|earlier| rule.is_shadowed_by(earlier))
            {
                return Err(RuleDefect::new(
                    RuleDefectKind::Shadowed { by },
                    index,
                    &rule.pattern,
                ));
            }
            if rule.class != AccessClass::Public {
                if let Some(offset) = self.rules[index + 1..].iter().position(|later| {
                    later.class == AccessClass::Public && rule.is_shadowed_by(later)
                }) {
                    return Err(RuleDefect::new(
                        RuleDefectKind::PublicOverlap {
                            public: index + 1 + offset,
                        },
                        index,
                        &rule.pattern,
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for RuleSet {
    /// Login page and auth callbacks are public, `/admin` is admin-only,
    /// everything else is protected.
    fn default() -> Self {
        Self {
            rules: vec![
                PathRule::exact(LOGIN_PATH, AccessClass::Public),
                PathRule::prefix(AUTH_CALLBACK_PREFIX, AccessClass::Public),
                PathRule::prefix(ADMIN_PREFIX, AccessClass::AdminOnly),
            ],
        }
    }
}

/// Builder for [`RuleSet`]. Rules are kept in insertion order.
///
/// # Examples
///
/// ```
/// use request_gate::{AccessClass, RuleSet};
///
/// let rules = RuleSet::builder()
///     .public_exact("/login")
///     .public_prefix("/api/auth")
///     .admin_prefix("/admin")
///     .build()
///     .expect("valid rules");
///
/// assert_eq!(rules.classify("/admin"), AccessClass::AdminOnly);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<PathRule>,
}

impl RuleSetBuilder {
    /// Appends a rule. An identical rule already present is not added again.
    pub fn rule(mut self, rule: PathRule) -> Self {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
        self
    }

    /// Appends an exact-match public rule.
    pub fn public_exact(self, pattern: impl Into<String>) -> Self {
        self.rule(PathRule::exact(pattern, AccessClass::Public))
    }

    /// Appends a prefix public rule.
    pub fn public_prefix(self, pattern: impl Into<String>) -> Self {
        self.rule(PathRule::prefix(pattern, AccessClass::Public))
    }

    /// Appends a prefix admin-only rule.
    pub fn admin_prefix(self, pattern: impl Into<String>) -> Self {
        self.rule(PathRule::prefix(pattern, AccessClass::AdminOnly))
    }

    /// Appends a prefix protected rule.
    pub fn protected_prefix(self, pattern: impl Into<String>) -> Self {
        self.rule(PathRule::prefix(pattern, AccessClass::Protected))
    }

    /// Validates and freezes the rule set.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleDefect`] if [`RuleSet::validate`] fails.
    pub fn build(self) -> Result<RuleSet, RuleDefect> {
        let set = RuleSet { rules: self.rules };
        set.validate()?;
        Ok(set)
    }
}
