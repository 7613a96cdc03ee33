//! Gate configuration loaded once at startup.

use std::path::Path;
use std::sync::Arc;

use axum::http::HeaderValue;
use serde::Deserialize;

use crate::error::Error;
use crate::gate::{RequestGate, DEFAULT_ADMIN_ROLE, DEFAULT_HOME_PATH};
use crate::matcher::{ExclusionMatcher, Overlap, DEFAULT_EXCLUDE_PATTERN};
use crate::policy::PathRule;
use crate::rules::RuleSet;
use crate::web::{ExtensionIdentity, GateState, IdentitySupplier};

/// Environment variable naming the TOML configuration file.
pub const CONFIG_ENV_VAR: &str = "REQUEST_GATE_CONFIG";

/// Gate configuration.
///
/// Every field has a default matching the production rules, so an empty
/// document is a valid configuration.
///
/// ```toml
/// home_path = "/home"
/// admin_role = "admin"
/// exclude = '^/(?:_next/static|_next/image|favicon\.ico)|\.(?:svg|png|jpg|jpeg|gif|webp)$'
/// strict_exclusions = false
///
/// [[rules]]
/// kind = "exact"
/// pattern = "/login"
/// class = "public"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Redirect target for authenticated callers lacking the admin role
    pub home_path: String,
    /// Role required on admin-only paths
    pub admin_role: String,
    /// Regex of paths that bypass the gate
    pub exclude: String,
    /// Fail startup instead of warning when a non-public rule overlaps
    /// the exclusion pattern
    pub strict_exclusions: bool,
    /// Path rules in evaluation order
    pub rules: Vec<PathRule>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            home_path: DEFAULT_HOME_PATH.to_string(),
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
            exclude: DEFAULT_EXCLUDE_PATTERN.to_string(),
            strict_exclusions: false,
            rules: RuleSet::default().rules().to_vec(),
        }
    }
}

impl GateConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed TOML or unknown fields.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::Config`] if it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads the file named by `REQUEST_GATE_CONFIG`, or the defaults when
    /// the variable is unset.
    ///
    /// # Errors
    ///
    /// Same as [`GateConfig::from_file`].
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                tracing::info!(path = ?path, "loading gate config");
                Self::from_file(path)
            }
            None => {
                tracing::info!("{} not set, using default gate config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Builds the validated rule set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rule`] if the rules are malformed.
    pub fn rule_set(&self) -> Result<RuleSet, Error> {
        let builder = self
            .rules
            .iter()
            .cloned()
            .fold(RuleSet::builder(), |builder, rule| builder.rule(rule));
        Ok(builder.build()?)
    }

    /// Lists non-public rules that the exclusion pattern (partly) bypasses.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the exclusion pattern does not compile.
    pub fn exclusion_overlaps(&self) -> Result<Vec<(PathRule, Overlap)>, Error> {
        let matcher = ExclusionMatcher::new(&self.exclude)?;
        Ok(self
            .rules
            .iter()
            .filter_map(|rule| matcher.overlap(rule).map(|overlap| (rule.clone(), overlap)))
            .collect())
    }

    /// Builds the gate described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rule`] for a malformed rule set, or
    /// [`Error::HomePath`] if the redirect target cannot be sent as a
    /// `Location` header.
    pub fn gate(&self) -> Result<RequestGate, Error> {
        if !self.home_path.starts_with('/') || HeaderValue::from_str(&self.home_path).is_err() {
            return Err(Error::HomePath(self.home_path.clone()));
        }
        Ok(RequestGate::new(Arc::new(self.rule_set()?))
            .with_home(self.home_path.clone())
            .with_admin_role(self.admin_role.clone()))
    }

    /// Validates everything and produces the runtime state for the
    /// interception layer, using [`ExtensionIdentity`] as supplier.
    ///
    /// # Errors
    ///
    /// See [`GateConfig::build_with`].
    pub fn build(&self) -> Result<GateState, Error> {
        self.build_with(ExtensionIdentity)
    }

    /// Like [`GateConfig::build`] with a custom identity supplier.
    ///
    /// Exclusion overlaps are logged at `warn`, or rejected with
    /// [`Error::ExclusionOverlap`] when `strict_exclusions` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`], [`Error::Rule`] or
    /// [`Error::ExclusionOverlap`].
    pub fn build_with(&self, supplier: impl IdentitySupplier) -> Result<GateState, Error> {
        let gate = self.gate()?;
        let exclusions = ExclusionMatcher::new(&self.exclude)?;

        for (rule, overlap) in self.exclusion_overlaps()? {
            if self.strict_exclusions {
                return Err(Error::ExclusionOverlap {
                    rule: rule.to_string(),
                    overlap,
                });
            }
            tracing::warn!(
                rule = %rule,
                overlap = %overlap,
                "rule overlaps the exclusion pattern; matching paths bypass the gate"
            );
        }

        tracing::info!(
            rules = gate.rules().rules().len(),
            home = %gate.home_path(),
            exclude = %exclusions.as_str(),
            "request gate configured"
        );

        Ok(GateState::new(gate, exclusions, supplier))
    }
}
