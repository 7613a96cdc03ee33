//! Request-time authorization gate for HTTP applications.
//!
//! For every request the gate decides whether the request may proceed,
//! must be redirected, or must be rejected, from two inputs:
//! - the request **path**, classified by an ordered [`RuleSet`]
//! - the caller's **Identity Context**, an optional verified [`Identity`]
//!
//! # Core Types
//!
//! - [`RuleSet`]: Ordered `(match-kind, pattern, access class)` rules, first match wins
//! - [`AccessClass`]: `public`, `admin-only` or `protected`
//! - [`RequestGate`]: The pre-check and the full disposition logic, both pure
//! - [`Disposition`]: `Allow`, `Redirect(target)` or `Deny`
//! - [`ExclusionMatcher`]: Paths that never reach the gate
//! - [`GateConfig`]: TOML configuration loaded once at startup
//! - [`web`]: axum middleware wiring it all together
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use request_gate::{Disposition, Identity, RequestGate, RuleSet};
//!
//! let gate = RequestGate::new(Arc::new(RuleSet::default()));
//!
//! // Authentication endpoints stay reachable
//! assert_eq!(gate.evaluate("/login", None), Disposition::Allow);
//!
//! // Anonymous callers are rejected everywhere else
//! assert!(!gate.is_request_authorized(None, "/dashboard"));
//!
//! // Known but unprivileged callers are steered away from admin pages
//! let editor = Identity::new("user-1").with_role("editor");
//! assert_eq!(
//!     gate.evaluate("/admin/users", Some(&editor)),
//!     Disposition::Redirect("/home".to_string())
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod disposition;
mod error;
mod gate;
mod identity;
mod logging;
mod matcher;
mod policy;
mod rules;
pub mod web;

pub use config::{GateConfig, CONFIG_ENV_VAR};
pub use disposition::Disposition;
pub use error::{Error, RuleDefect, RuleDefectKind};
pub use gate::{RequestGate, DEFAULT_ADMIN_ROLE, DEFAULT_HOME_PATH};
pub use identity::Identity;
pub use logging::GateLog;
pub use matcher::{ExclusionMatcher, Overlap, DEFAULT_EXCLUDE_PATTERN};
pub use policy::{AccessClass, MatchKind, PathRule};
pub use rules::{RuleSet, RuleSetBuilder, ADMIN_PREFIX, AUTH_CALLBACK_PREFIX, LOGIN_PATH};
