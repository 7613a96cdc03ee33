//! Property tests for the request gate.
//!
//! These tests validate the decision contract over arbitrary paths and
//! identities using property-based testing.

use std::sync::Arc;

use proptest::prelude::*;
use request_gate::{
    AccessClass, Disposition, ExclusionMatcher, Identity, RequestGate, RuleSet, ADMIN_PREFIX,
    AUTH_CALLBACK_PREFIX, LOGIN_PATH,
};

fn gate() -> RequestGate {
    RequestGate::new(Arc::new(RuleSet::default()))
}

// Strategy: Generate an arbitrary path segment tail
fn arb_tail() -> impl Strategy<Value = String> {
    prop::string::string_regex("(/[a-z0-9_.-]{0,8}){0,4}").unwrap()
}

// Strategy: Generate paths in the public set
fn arb_public_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(LOGIN_PATH.to_string()),
        arb_tail().prop_map(|tail| format!("{}{}", AUTH_CALLBACK_PREFIX, tail)),
    ]
}

// Strategy: Generate paths under the admin prefix
fn arb_admin_path() -> impl Strategy<Value = String> {
    arb_tail().prop_map(|tail| format!("{}{}", ADMIN_PREFIX, tail))
}

// Strategy: Generate arbitrary absolute paths
fn arb_path() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_public_path(),
        arb_admin_path(),
        prop::string::string_regex("/[ -~]{0,30}").unwrap(),
    ]
}

// Strategy: Generate paths that are neither public nor admin-only
fn arb_protected_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("/[a-z0-9/_.-]{0,30}")
        .unwrap()
        .prop_filter("neither public nor admin", |p| {
            p != LOGIN_PATH && !p.starts_with(AUTH_CALLBACK_PREFIX) && !p.starts_with(ADMIN_PREFIX)
        })
}

// Strategy: Generate roles, including absent and admin
fn arb_role() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("admin".to_string())),
        Just(Some("editor".to_string())),
        Just(Some("Admin".to_string())),
        prop::string::string_regex("[a-z]{0,8}").unwrap().prop_map(Some),
    ]
}

fn arb_identity() -> impl Strategy<Value = Identity> {
    (
        prop::option::of(prop::string::string_regex("[a-z0-9-]{3,10}").unwrap()),
        arb_role(),
    )
        .prop_map(|(subject, role)| Identity { subject, role })
}

fn arb_non_admin_identity() -> impl Strategy<Value = Identity> {
    arb_identity().prop_filter("role is not admin", |id| !id.has_role("admin"))
}

proptest! {
    /// Property: public paths are allowed for everyone, anonymous included
    #[test]
    fn public_paths_always_allowed(
        path in arb_public_path(),
        identity in prop::option::of(arb_identity())
    ) {
        let gate = gate();
        prop_assert!(gate.is_request_authorized(identity.as_ref(), &path));
        prop_assert_eq!(gate.evaluate(&path, identity.as_ref()), Disposition::Allow);
        prop_assert_eq!(gate.decide(&path, identity.as_ref()), Disposition::Allow);
    }

    /// Property: anonymous callers fail the pre-check on every non-public path
    #[test]
    fn anonymous_denied_off_public_set(path in arb_path()) {
        let gate = gate();
        prop_assume!(!gate.rules().is_public(&path));
        prop_assert!(!gate.is_request_authorized(None, &path));
        prop_assert_eq!(gate.decide(&path, None), Disposition::Deny);
    }

    /// Property: present non-admin identities are redirected home from admin paths
    #[test]
    fn non_admin_redirected_from_admin(
        path in arb_admin_path(),
        identity in arb_non_admin_identity()
    ) {
        prop_assert_eq!(
            gate().decide(&path, Some(&identity)),
            Disposition::Redirect("/home".to_string())
        );
    }

    /// Property: admins are allowed on admin paths
    #[test]
    fn admin_allowed_on_admin(path in arb_admin_path(), subject in "[a-z]{1,8}") {
        let admin = Identity::new(subject).with_role("admin");
        prop_assert_eq!(gate().decide(&path, Some(&admin)), Disposition::Allow);
    }

    /// Property: any present identity is allowed on protected paths
    #[test]
    fn any_identity_allowed_on_protected(
        path in arb_protected_path(),
        identity in arb_identity()
    ) {
        prop_assert_eq!(gate().classify(&path), AccessClass::Protected);
        prop_assert_eq!(gate().decide(&path, Some(&identity)), Disposition::Allow);
    }

    /// Property: classification is total and evaluation has no hidden state
    #[test]
    fn evaluation_is_idempotent(
        path in arb_path(),
        identity in prop::option::of(arb_identity())
    ) {
        let gate = gate();
        let first = gate.decide(&path, identity.as_ref());
        let second = gate.decide(&path, identity.as_ref());
        prop_assert_eq!(first, second);
        prop_assert_eq!(gate.classify(&path), gate.classify(&path));
    }

    /// Property: evaluate never reaches Deny once the pre-check has passed
    #[test]
    fn evaluate_after_precheck_never_denies(
        path in arb_path(),
        identity in prop::option::of(arb_identity())
    ) {
        let gate = gate();
        if gate.is_request_authorized(identity.as_ref(), &path) {
            prop_assert_ne!(gate.evaluate(&path, identity.as_ref()), Disposition::Deny);
        }
    }

    /// Property: image assets are excluded wherever they live
    #[test]
    fn image_assets_excluded(
        dir in "(/[a-z0-9]{1,6}){0,3}",
        name in "[a-z0-9]{1,8}",
        ext in prop_oneof![Just("svg"), Just("png"), Just("jpg"), Just("jpeg"), Just("gif"), Just("webp")]
    ) {
        let path = format!("{}/{}.{}", dir, name, ext);
        prop_assert!(ExclusionMatcher::default().is_excluded(&path));
    }
}
