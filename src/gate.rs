use std::sync::Arc;

use crate::{disposition::Disposition, identity::Identity, policy::AccessClass, rules::RuleSet};

/// Where insufficiently privileged callers are sent.
pub const DEFAULT_HOME_PATH: &str = "/home";
/// Role required for admin-only paths.
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

/// The request gate.
///
/// A pure decision function over `(path, identity, rule set)`. The gate
/// holds no mutable state; one instance is shared by every request.
///
/// The hosting layer calls [`is_request_authorized`](Self::is_request_authorized)
/// first and only runs [`evaluate`](Self::evaluate) when the pre-check
/// passes. [`decide`](Self::decide) performs exactly that composition.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use request_gate::{Disposition, Identity, RequestGate, RuleSet};
///
/// let gate = RequestGate::new(Arc::new(RuleSet::default()));
/// let editor = Identity::new("u1").with_role("editor");
///
/// assert_eq!(gate.decide("/login", None), Disposition::Allow);
/// assert_eq!(gate.decide("/dashboard", None), Disposition::Deny);
/// assert_eq!(
///     gate.decide("/admin/users", Some(&editor)),
///     Disposition::Redirect("/home".to_string())
/// );
/// assert_eq!(gate.decide("/profile", Some(&editor)), Disposition::Allow);
/// ```
#[derive(Debug, Clone)]
pub struct RequestGate {
    rules: Arc<RuleSet>,
    home_path: String,
    admin_role: String,
}

impl RequestGate {
    /// Creates a gate over `rules` with the default home path and admin role.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            home_path: DEFAULT_HOME_PATH.to_string(),
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
        }
    }

    /// Sets the redirect target used for the soft admin denial.
    pub fn with_home(mut self, home_path: impl Into<String>) -> Self {
        self.home_path = home_path.into();
        self
    }

    /// Sets the role that admin-only paths require.
    pub fn with_admin_role(mut self, admin_role: impl Into<String>) -> Self {
        self.admin_role = admin_role.into();
        self
    }

    /// Returns the rule set this gate classifies with.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the soft-denial redirect target.
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    /// Returns the role admin-only paths require.
    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    /// Classifies `path` against the gate's rule set.
    pub fn classify(&self, path: &str) -> AccessClass {
        self.rules.classify(path)
    }

    /// The pre-check: "must be authenticated at all".
    ///
    /// Public paths pass for everyone. Any other path passes iff an
    /// identity is present; the role is not considered here.
    pub fn is_request_authorized(&self, identity: Option<&Identity>, path: &str) -> bool {
        if self.rules.is_public(path) {
            return true;
        }
        identity.is_some()
    }

    /// Full disposition logic for one request.
    ///
    /// Rules are applied in a fixed order; the first one that applies wins:
    /// 1. public path → `Allow`, whatever the identity
    /// 2. no identity → `Deny`
    /// 3. admin-only path and role is not the admin role → `Redirect(home)`
    /// 4. otherwise → `Allow`
    pub fn evaluate(&self, path: &str, identity: Option<&Identity>) -> Disposition {
        let class = self.rules.classify(path);

        if class == AccessClass::Public {
            return Disposition::Allow;
        }

        let Some(identity) = identity else {
            return Disposition::Deny;
        };

        if class == AccessClass::AdminOnly && !identity.has_role(&self.admin_role) {
            return Disposition::Redirect(self.home_path.clone());
        }

        Disposition::Allow
    }

    /// Pre-check followed by [`evaluate`](Self::evaluate), as the hosting
    /// layer runs them. A failed pre-check is `Deny` and `evaluate` is not
    /// consulted.
    pub fn decide(&self, path: &str, identity: Option<&Identity>) -> Disposition {
        if !self.is_request_authorized(identity, path) {
            return Disposition::Deny;
        }
        self.evaluate(path, identity)
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new(Arc::new(RuleSet::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> RequestGate {
        RequestGate::default()
    }

    fn with_role(role: &str) -> Identity {
        Identity::new("user-1").with_role(role)
    }

    #[test]
    fn public_paths_allow_anonymous() {
        assert_eq!(gate().evaluate("/login", None), Disposition::Allow);
        assert_eq!(gate().evaluate("/api/auth/callback", None), Disposition::Allow);
    }

    #[test]
    fn public_paths_allow_any_identity() {
        let editor = with_role("editor");
        assert_eq!(gate().evaluate("/login", Some(&editor)), Disposition::Allow);
    }

    #[test]
    fn anonymous_is_denied_on_protected_and_admin_paths() {
        assert_eq!(gate().evaluate("/dashboard", None), Disposition::Deny);
        assert_eq!(gate().evaluate("/admin/users", None), Disposition::Deny);
    }

    #[test]
    fn non_admin_is_redirected_home() {
        let editor = with_role("editor");
        assert_eq!(
            gate().evaluate("/admin/users", Some(&editor)),
            Disposition::Redirect("/home".to_string())
        );
    }

    #[test]
    fn roleless_identity_is_redirected_from_admin() {
        let roleless = Identity::new("user-2");
        assert_eq!(
            gate().evaluate("/admin", Some(&roleless)),
            Disposition::Redirect("/home".to_string())
        );
    }

    #[test]
    fn roleless_identity_is_allowed_on_protected() {
        let roleless = Identity::new("user-2");
        assert_eq!(gate().evaluate("/profile", Some(&roleless)), Disposition::Allow);
    }

    #[test]
    fn admin_is_allowed_on_admin_paths() {
        let admin = with_role("admin");
        assert_eq!(gate().evaluate("/admin/users", Some(&admin)), Disposition::Allow);
    }

    #[test]
    fn precheck_ignores_role() {
        let editor = with_role("editor");
        assert!(gate().is_request_authorized(Some(&editor), "/admin/users"));
        assert!(gate().is_request_authorized(None, "/login"));
        assert!(!gate().is_request_authorized(None, "/profile"));
        assert!(!gate().is_request_authorized(None, "/admin"));
    }

    #[test]
    fn decide_denies_when_precheck_fails() {
        assert_eq!(gate().decide("/dashboard", None), Disposition::Deny);
    }

    #[test]
    fn custom_home_and_admin_role() {
        let gate = gate().with_home("/").with_admin_role("superuser");
        let admin = with_role("admin");
        let superuser = with_role("superuser");

        assert_eq!(
            gate.evaluate("/admin", Some(&admin)),
            Disposition::Redirect("/".to_string())
        );
        assert_eq!(gate.evaluate("/admin", Some(&superuser)), Disposition::Allow);
        assert_eq!(gate.home_path(), "/");
        assert_eq!(gate.admin_role(), "superuser");
    }

    #[test]
    fn gate_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<RequestGate>();
    }
}
