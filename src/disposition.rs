use std::fmt;

/// The gate's decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Forward the request unchanged
    Allow,
    /// Divert the request to a fixed path without invoking the application
    Redirect(String),
    /// Reject the request as unauthorized
    Deny,
}

impl Disposition {
    /// Returns `true` for [`Disposition::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, Disposition::Allow)
    }

    /// Returns the redirect target, if this is a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Disposition::Redirect(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Allow => write!(f, "allow"),
            Disposition::Redirect(target) => write!(f, "redirect({})", target),
            Disposition::Deny => write!(f, "deny"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Disposition::Allow.to_string(), "allow");
        assert_eq!(
            Disposition::Redirect("/home".to_string()).to_string(),
            "redirect(/home)"
        );
        assert_eq!(Disposition::Deny.to_string(), "deny");
    }

    #[test]
    fn redirect_target() {
        assert_eq!(
            Disposition::Redirect("/home".to_string()).redirect_target(),
            Some("/home")
        );
        assert_eq!(Disposition::Allow.redirect_target(), None);
        assert!(Disposition::Allow.is_allow());
        assert!(!Disposition::Deny.is_allow());
    }
}
