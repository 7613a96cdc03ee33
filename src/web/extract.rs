//! Identity extraction at the interception boundary.

use axum::http::request::Parts;

use crate::identity::Identity;

/// Supplies the Identity Context for one request.
///
/// Implementations sit on the boundary between a token-verification
/// collaborator and the gate. The gate trusts whatever is returned and
/// does not verify it again. A missing token and an invalid token must
/// both come back as `None`.
///
/// Closures of the form `Fn(&Parts) -> Option<Identity>` implement this
/// trait.
///
/// # Examples
///
/// ```
/// use axum::http::{request::Parts, Request};
/// use request_gate::web::IdentitySupplier;
/// use request_gate::Identity;
///
/// let supplier = |parts: &Parts| {
///     parts
///         .headers
///         .get("x-verified-role")
///         .and_then(|v| v.to_str().ok())
///         .map(|role| Identity::default().with_role(role))
/// };
///
/// let (parts, _) = Request::builder()
///     .header("x-verified-role", "admin")
///     .body(())
///     .unwrap()
///     .into_parts();
///
/// assert_eq!(supplier.identify(&parts).unwrap().role(), Some("admin"));
/// ```
pub trait IdentitySupplier: Send + Sync + 'static {
    /// Returns the verified identity of the caller, or `None` if anonymous.
    fn identify(&self, parts: &Parts) -> Option<Identity>;
}

impl<F> IdentitySupplier for F
where
    F: Fn(&Parts) -> Option<Identity> + Send + Sync + 'static,
{
    fn identify(&self, parts: &Parts) -> Option<Identity> {
        self(parts)
    }
}

/// Reads an [`Identity`] placed in the request extensions by upstream
/// token-verification middleware.
///
/// This mirrors the usual axum layering: an authentication layer verifies
/// the token and inserts the result, and the gate layer runs after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionIdentity;

impl IdentitySupplier for ExtensionIdentity {
    fn identify(&self, parts: &Parts) -> Option<Identity> {
        parts.extensions.get::<Identity>().cloned()
    }
}
