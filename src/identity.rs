/// Verified description of the caller for one request.
///
/// An `Identity` is produced upstream by whatever verifies the caller's
/// token, once per request. The gate reads it and never modifies it.
/// Anonymous callers carry no `Identity` at all (`Option::None`). The
/// gate does not tell a missing token apart from an invalid one.
///
/// `role` may be absent even when the identity is present: an
/// authenticated but roleless caller is a valid state.
///
/// # Examples
///
/// ```
/// use request_gate::Identity;
///
/// let editor = Identity::new("user-7").with_role("editor");
/// assert_eq!(editor.role(), Some("editor"));
/// assert!(!editor.has_role("admin"));
///
/// let roleless = Identity::new("user-8");
/// assert!(roleless.role().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Subject the token was issued to, if the supplier exposes one
    pub subject: Option<String>,
    /// Role claim carried by the token
    pub role: Option<String>,
}

impl Identity {
    /// Creates an identity for `subject` with no role.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            role: None,
        }
    }

    /// Sets the role claim.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Returns the subject, if any.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Returns the role claim, if any.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns `true` if the role claim equals `role` exactly.
    pub fn has_role(&self, role: &str) -> bool {
        self.role() == Some(role)
    }
}
