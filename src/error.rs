use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::matcher::Overlap;

/// Errors raised while loading or validating gate configuration.
///
/// Request evaluation itself never fails; these only occur at startup.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read
    #[error("failed to read gate config {}: {source}", path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for `GateConfig`
    #[error("invalid gate config: {0}")]
    Config(#[from] toml::de::Error),

    /// The exclusion pattern is not a valid regular expression
    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The exclusion pattern could not be analyzed for overlaps
    #[error("unsupported exclusion pattern: {0}")]
    PatternSyntax(#[from] regex_syntax::Error),

    /// The path rule set is malformed
    #[error("rule set defect: {0}")]
    Rule(#[from] RuleDefect),

    /// The redirect target is not an absolute path usable in a
    /// `Location` header
    #[error("invalid home path `{0}`: must start with '/' and be a valid header value")]
    HomePath(String),

    /// A non-public rule is (partly) hidden by the exclusion matcher and
    /// strict exclusions are enabled
    #[error("rule `{rule}` overlaps the exclusion matcher: {overlap}")]
    ExclusionOverlap {
        /// Rule that the exclusion matcher would bypass
        rule: String,
        /// Where the overlap was found
        overlap: Overlap,
    },
}

/// A configuration defect in a [`RuleSet`](crate::RuleSet).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule #{index} `{pattern}`: {kind}")]
pub struct RuleDefect {
    /// The kind of defect
    pub kind: RuleDefectKind,
    /// Position of the offending rule in evaluation order
    pub index: usize,
    /// Pattern of the offending rule
    pub pattern: String,
}

impl RuleDefect {
    /// Creates a new defect report.
    pub fn new(kind: RuleDefectKind, index: usize, pattern: impl Into<String>) -> Self {
        Self {
            kind,
            index,
            pattern: pattern.into(),
        }
    }
}

/// The kind of rule set defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDefectKind {
    /// The pattern is empty
    EmptyPattern,
    /// The pattern does not start with `/`
    NotAbsolute,
    /// An earlier rule matches every path this rule could match
    Shadowed {
        /// Index of the earlier rule
        by: usize,
    },
    /// A later public rule matches every path this non-public rule
    /// matches, so this rule removes paths from the public set
    PublicOverlap {
        /// Index of the later public rule
        public: usize,
    },
}

impl fmt::Display for RuleDefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDefectKind::EmptyPattern => write!(f, "empty pattern"),
            RuleDefectKind::NotAbsolute => write!(f, "pattern must start with '/'"),
            RuleDefectKind::Shadowed { by } => write!(f, "unreachable, shadowed by rule #{}", by),
            RuleDefectKind::PublicOverlap { public } => {
                write!(f, "restricts paths of public rule #{}", public)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_defect_display_names_rule() {
        let defect = RuleDefect::new(RuleDefectKind::Shadowed { by: 1 }, 2, "/api/auth/admin");
        assert_eq!(
            defect.to_string(),
            "rule #2 `/api/auth/admin`: unreachable, shadowed by rule #1"
        );
    }

    #[test]
    fn public_overlap_display_names_public_rule() {
        let defect = RuleDefect::new(RuleDefectKind::PublicOverlap { public: 1 }, 0, "/api/auth/admin");
        assert_eq!(
            defect.to_string(),
            "rule #0 `/api/auth/admin`: restricts paths of public rule #1"
        );
    }

    #[test]
    fn rule_defect_converts_into_error() {
        let err: Error = RuleDefect::new(RuleDefectKind::EmptyPattern, 0, "").into();
        assert!(matches!(err, Error::Rule(_)));
        assert!(err.to_string().starts_with("rule set defect"));
    }
}
