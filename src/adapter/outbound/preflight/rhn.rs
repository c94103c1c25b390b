//! Red Hat Network registration check.

use std::process::Command;

use crate::port::{Rule, RuleLevel, RuleViolation};

const NOT_REGISTERED: &str = "This system is not registered";

/// Passes when the package manager reports the host as registered.
#[derive(Debug, Clone)]
pub struct RhnRule {
    program: String,
    args: Vec<String>,
}

impl RhnRule {
    /// Ask `dnf repolist`.
    pub fn new() -> Self {
        Self::with_command("dnf", vec!["repolist".into()])
    }

    pub fn with_command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for RhnRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for RhnRule {
    fn name(&self) -> &'static str {
        "rhn"
    }

    fn verify(&self) -> Result<(), RuleViolation> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| RuleViolation::new(format!("failed to run {}: {e}", self.program)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        if combined.contains(NOT_REGISTERED) {
            return Err(RuleViolation::new("system is not registered with RHN"));
        }
        if !output.status.success() {
            return Err(RuleViolation::new(format!(
                "failed to check registration status: {} exited with {}",
                self.program, output.status
            )));
        }
        Ok(())
    }

    fn message(&self) -> String {
        "System is registered with RHN".into()
    }

    fn level(&self) -> RuleLevel {
        RuleLevel::Error
    }

    fn hint(&self) -> Option<String> {
        Some("Register the host with `subscription-manager register`".into())
    }
}
