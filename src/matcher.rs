//! Interception boundary exclusions.
//!
//! Paths matched by the [`ExclusionMatcher`] bypass the gate entirely:
//! framework assets, the favicon and common image files. The matcher is
//! maintained separately from the [`RuleSet`](crate::RuleSet), so the two
//! can disagree; [`ExclusionMatcher::overlap`] exposes where.

use std::fmt;

use regex::Regex;
use regex_syntax::hir::{Hir, HirKind, Look};

use crate::error::Error;
use crate::policy::{AccessClass, MatchKind, PathRule};

/// Paths the gate never sees: `/_next/static*`, `/_next/image*`,
/// `/favicon.ico*` and anything ending in a common image extension.
pub const DEFAULT_EXCLUDE_PATTERN: &str =
    r"^/(?:_next/static|_next/image|favicon\.ico)|\.(?:svg|png|jpg|jpeg|gif|webp)$";

/// Suffixes tried under prefix rules when looking for exclusion overlaps.
const ASSET_SUFFIXES: &[&str] = &["", "/", "/asset.png", "/asset.svg", ".png"];

/// Suffixes appended to literal prefixes taken from the pattern itself.
const LITERAL_SUFFIXES: &[&str] = &["", "x", "/x"];

/// Upper bound on literal branches tracked per pattern.
const MAX_BRANCHES: usize = 64;

/// Literal text every match of one pattern branch starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LiteralPrefix {
    text: String,
    /// The branch consists of nothing but this literal (and zero-width
    /// assertions)
    complete: bool,
}

impl LiteralPrefix {
    fn new(text: impl Into<String>, complete: bool) -> Self {
        Self {
            text: text.into(),
            complete,
        }
    }

    fn unknown() -> Self {
        Self::new("", false)
    }
}

/// Where an exclusion pattern can match, as far as its syntax tells.
#[derive(Debug, Clone, Default)]
struct PatternShape {
    /// Prefixes of branches anchored at the start of the path
    anchored: Vec<LiteralPrefix>,
    /// Literal starts of branches that may match anywhere in the path
    floating: Vec<LiteralPrefix>,
}

impl PatternShape {
    fn analyze(hir: &Hir) -> Self {
        let branches: Vec<&Hir> = match hir.kind() {
            HirKind::Alternation(alts) => alts.iter().collect(),
            _ => vec![hir],
        };
        let mut shape = Self::default();
        for branch in branches {
            match branch.kind() {
                HirKind::Concat(items) if items.first().is_some_and(is_start_anchor) => {
                    shape.anchored.extend(concat_prefixes(&items[1..]));
                }
                _ if is_start_anchor(branch) => shape.anchored.push(LiteralPrefix::new("", true)),
                _ => shape.floating.extend(prefixes(branch)),
            }
        }
        shape
    }
}

fn is_start_anchor(hir: &Hir) -> bool {
    matches!(
        hir.kind(),
        HirKind::Look(Look::Start | Look::StartLF | Look::StartCRLF)
    )
}

fn prefixes(hir: &Hir) -> Vec<LiteralPrefix> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => vec![LiteralPrefix::new("", true)],
        HirKind::Literal(lit) => vec![LiteralPrefix::new(String::from_utf8_lossy(&lit.0), true)],
        HirKind::Capture(cap) => prefixes(&cap.sub),
        HirKind::Concat(items) => concat_prefixes(items),
        HirKind::Alternation(alts) => {
            let all: Vec<LiteralPrefix> = alts.iter().flat_map(prefixes).collect();
            if all.len() > MAX_BRANCHES {
                vec![LiteralPrefix::unknown()]
            } else {
                all
            }
        }
        HirKind::Class(_) | HirKind::Repetition(_) => vec![LiteralPrefix::unknown()],
    }
}

fn concat_prefixes(items: &[Hir]) -> Vec<LiteralPrefix> {
    let mut acc = vec![LiteralPrefix::new("", true)];
    for item in items {
        if acc.iter().all(|p| !p.complete) {
            break;
        }
        let next = prefixes(item);
        acc = acc
            .into_iter()
            .flat_map(|p| {
                if p.complete {
                    next.iter()
                        .map(|n| LiteralPrefix::new(format!("{}{}", p.text, n.text), n.complete))
                        .collect()
                } else {
                    vec![p]
                }
            })
            .collect();
        if acc.len() > MAX_BRANCHES {
            return vec![LiteralPrefix::unknown()];
        }
    }
    acc
}

/// A non-public rule that the exclusion pattern (partly) hides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlap {
    /// This path falls under the rule and is excluded
    Confirmed(String),
    /// No concrete path was found, but the pattern may exclude paths
    /// starting with this text under the rule
    Possible(String),
}

impl Overlap {
    /// The sample path or the suspect prefix.
    pub fn sample(&self) -> &str {
        match self {
            Overlap::Confirmed(path) | Overlap::Possible(path) => path,
        }
    }
}

impl fmt::Display for Overlap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Overlap::Confirmed(path) => write!(f, "`{}` is excluded", path),
            Overlap::Possible(prefix) => write!(f, "paths starting with `{}` may be excluded", prefix),
        }
    }
}

/// Compiled exclusion pattern.
///
/// # Examples
///
/// ```
/// use request_gate::ExclusionMatcher;
///
/// let matcher = ExclusionMatcher::default();
/// assert!(matcher.is_excluded("/_next/static/chunks/app.js"));
/// assert!(matcher.is_excluded("/images/logo.png"));
/// assert!(!matcher.is_excluded("/dashboard"));
/// ```
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    regex: Regex,
    shape: PatternShape,
}

impl ExclusionMatcher {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(pattern)?;
        let hir = regex_syntax::parse(pattern)?;
        Ok(Self {
            regex,
            shape: PatternShape::analyze(&hir),
        })
    }

    /// Returns `true` if `path` must bypass the gate.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Returns the source pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Checks whether the pattern hides paths that a non-public `rule`
    /// claims to protect. Public rules never overlap.
    ///
    /// Concrete samples come from fixed asset suffixes and from the
    /// literal prefixes of the pattern's own branches. When no sample is
    /// found but the pattern cannot be ruled out, the overlap is reported
    /// as [`Overlap::Possible`].
    pub fn overlap(&self, rule: &PathRule) -> Option<Overlap> {
        if rule.class == AccessClass::Public {
            return None;
        }
        if rule.kind == MatchKind::Exact {
            return self
                .is_excluded(&rule.pattern)
                .then(|| Overlap::Confirmed(rule.pattern.clone()));
        }

        let fixed = ASSET_SUFFIXES
            .iter()
            .map(|suffix| format!("{}{}", rule.pattern, suffix));
        let anchored = self.shape.anchored.iter().flat_map(|p| {
            LITERAL_SUFFIXES
                .iter()
                .map(move |suffix| format!("{}{}", p.text, suffix))
        });
        let floating = self.shape.floating.iter().flat_map(|p| {
            [
                format!("{}{}", rule.pattern, p.text),
                format!("{}/x{}", rule.pattern, p.text),
            ]
        });
        if let Some(path) = fixed
            .chain(anchored)
            .chain(floating)
            .find(|candidate| rule.matches(candidate) && self.is_excluded(candidate))
        {
            return Some(Overlap::Confirmed(path));
        }

        let anchored_suspect = self.shape.anchored.iter().find(|p| {
            !p.complete && (p.text.starts_with(&rule.pattern) || rule.pattern.starts_with(&p.text))
        });
        if let Some(p) = anchored_suspect {
            let longer = if p.text.len() > rule.pattern.len() {
                &p.text
            } else {
                &rule.pattern
            };
            return Some(Overlap::Possible(longer.clone()));
        }
        self.shape
            .floating
            .first()
            .map(|_| Overlap::Possible(rule.pattern.clone()))
    }
}

impl Default for ExclusionMatcher {
    fn default() -> Self {
        // constant pattern
        Self::new(DEFAULT_EXCLUDE_PATTERN).expect("default exclusion pattern is valid")
    }
}
