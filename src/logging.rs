use crate::disposition::Disposition;
use crate::identity::Identity;
use crate::policy::AccessClass;

/// Per-request decision logger.
///
/// Bound to one request's id and path so every event it emits carries
/// both as structured `tracing` fields. Allows log at `debug`, redirects
/// at `info`, denials at `warn`. Token contents are never logged; only
/// the role claim is.
#[derive(Debug, Clone, Copy)]
pub struct GateLog<'a> {
    request_id: &'a str,
    path: &'a str,
}

impl<'a> GateLog<'a> {
    /// Creates a logger for one request.
    pub fn new(request_id: &'a str, path: &'a str) -> Self {
        Self { request_id, path }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Records a path that bypassed the gate through the exclusion matcher.
    pub fn excluded(&self) {
        tracing::trace!(
            request_id = %self.request_id,
            path = %self.path,
            "path excluded from gate"
        );
    }

    /// Records a failed pre-check.
    pub fn unauthenticated(&self, class: AccessClass) {
        tracing::warn!(
            request_id = %self.request_id,
            path = %self.path,
            class = %class,
            "pre-check failed: authentication required"
        );
    }

    /// Records the final disposition.
    pub fn decision(
        &self,
        class: AccessClass,
        identity: Option<&Identity>,
        disposition: &Disposition,
    ) {
        let role = identity.and_then(Identity::role).unwrap_or("<none>");
        let authenticated = identity.is_some();
        match disposition {
            Disposition::Allow => tracing::debug!(
                request_id = %self.request_id,
                path = %self.path,
                class = %class,
                authenticated,
                role,
                disposition = %disposition,
                "request allowed"
            ),
            Disposition::Redirect(target) => tracing::info!(
                request_id = %self.request_id,
                path = %self.path,
                class = %class,
                role,
                target = %target,
                disposition = %disposition,
                "insufficient role, redirecting"
            ),
            Disposition::Deny => tracing::warn!(
                request_id = %self.request_id,
                path = %self.path,
                class = %class,
                authenticated,
                disposition = %disposition,
                "request denied"
            ),
        }
    }
}
