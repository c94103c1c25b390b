//! Physical accelerator attachment check.

use std::process::Command;

use crate::port::{Rule, RuleLevel, RuleViolation};

/// Passes when the PCI listing mentions the configured accelerator.
#[derive(Debug, Clone)]
pub struct AcceleratorRule {
    pattern: String,
    program: String,
    args: Vec<String>,
}

impl AcceleratorRule {
    /// Look for `pattern` in the output of `lspci`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self::with_command(pattern, "lspci", Vec::new())
    }

    /// Look for `pattern` in the output of another listing command.
    pub fn with_command(
        pattern: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            program: program.into(),
            args,
        }
    }
}

impl Rule for AcceleratorRule {
    fn name(&self) -> &'static str {
        "accelerator"
    }

    fn verify(&self) -> Result<(), RuleViolation> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| RuleViolation::new(format!("failed to run {}: {e}", self.program)))?;
        if !output.status.success() {
            return Err(RuleViolation::new(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        if String::from_utf8_lossy(&output.stdout).contains(&self.pattern) {
            Ok(())
        } else {
            Err(RuleViolation::new(format!(
                "no '{}' device is attached",
                self.pattern
            )))
        }
    }

    fn message(&self) -> String {
        format!("{} is attached", self.pattern)
    }

    fn level(&self) -> RuleLevel {
        RuleLevel::Error
    }
}
