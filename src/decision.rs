//! Decision types produced by the hook state machine.

/// The structured outcome of evaluating one request.
///
/// Exactly one variant is produced per processed event. `Deny` reasons
/// reference paths and rule names only, never matched secret content.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Let the tool proceed.
    Allow,
    /// Let the tool proceed, but with its path argument rewritten to a
    /// redacted copy. Retained for protocol versions that honor in-place
    /// argument substitution; the Read path uses [`Decision::DenyWithRedirect`].
    AllowWithRedirect { new_path: String },
    /// Block the tool with a reason.
    Deny { reason: String },
    /// Block the original read and point the agent at a redacted copy.
    DenyWithRedirect { original: String, redacted: String },
    /// Emit this payload verbatim; no permission decision taken.
    PassThrough(String),
    /// Hard rejection of a prompt submission; the message goes to the user
    /// and the submission never reaches the agent.
    Blocked { message: String },
}

impl Decision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Decision::Deny {
            reason: reason.into(),
        }
    }

    pub fn is_deny(&self) -> bool {
        matches!(
            self,
            Decision::Deny { .. } | Decision::DenyWithRedirect { .. }
        )
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Blocked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_helper() {
        let d = Decision::deny("no");
        assert!(d.is_deny());
        assert!(!d.is_blocked());
    }

    #[test]
    fn test_deny_with_redirect_is_deny() {
        let d = Decision::DenyWithRedirect {
            original: "/a".to_string(),
            redacted: "/b".to_string(),
        };
        assert!(d.is_deny());
    }

    #[test]
    fn test_blocked_is_not_deny() {
        let d = Decision::Blocked {
            message: "rejected".to_string(),
        };
        assert!(d.is_blocked());
        assert!(!d.is_deny());
    }
}
