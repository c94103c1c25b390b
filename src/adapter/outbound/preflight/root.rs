//! Privilege check.

use crate::port::{Rule, RuleLevel, RuleViolation};

/// Passes when the process runs with an effective uid of 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct RootRule;

impl Rule for RootRule {
    fn name(&self) -> &'static str {
        "root"
    }

    fn verify(&self) -> Result<(), RuleViolation> {
        // SAFETY: geteuid has no preconditions and cannot fail.
        let euid = unsafe { libc::geteuid() };
        if euid == 0 {
            Ok(())
        } else {
            Err(RuleViolation::new(format!(
                "current user is not root (euid {euid})"
            )))
        }
    }

    fn message(&self) -> String {
        "Current user is root".into()
    }

    fn level(&self) -> RuleLevel {
        RuleLevel::Error
    }

    fn hint(&self) -> Option<String> {
        Some("Re-run with sudo or as root".into())
    }
}
