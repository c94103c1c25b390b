//! IBM Power generation check.

use std::path::PathBuf;

use crate::port::{Rule, RuleLevel, RuleViolation};

pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Passes on the configured architecture when `/proc/cpuinfo` names the
/// required processor generation.
#[derive(Debug, Clone)]
pub struct PowerRule {
    required_arch: String,
    actual_arch: String,
    processor: String,
    cpuinfo: PathBuf,
}

impl PowerRule {
    /// Check this host: the architecture this binary was built for and
    /// `/proc/cpuinfo`.
    pub fn new(required_arch: impl Into<String>, processor: impl Into<String>) -> Self {
        Self::with_host(
            required_arch,
            std::env::consts::ARCH,
            processor,
            CPUINFO_PATH,
        )
    }

    pub fn with_host(
        required_arch: impl Into<String>,
        actual_arch: impl Into<String>,
        processor: impl Into<String>,
        cpuinfo: impl Into<PathBuf>,
    ) -> Self {
        Self {
            required_arch: required_arch.into(),
            actual_arch: actual_arch.into(),
            processor: processor.into(),
            cpuinfo: cpuinfo.into(),
        }
    }
}

impl Rule for PowerRule {
    fn name(&self) -> &'static str {
        "power"
    }

    fn verify(&self) -> Result<(), RuleViolation> {
        if self.actual_arch != self.required_arch {
            return Err(RuleViolation::new(format!(
                "unsupported architecture {}, {} is required",
                self.actual_arch, self.required_arch
            )));
        }

        let cpuinfo = std::fs::read_to_string(&self.cpuinfo).map_err(|e| {
            RuleViolation::new(format!("failed to read {}: {e}", self.cpuinfo.display()))
        })?;
        if cpuinfo
            .to_lowercase()
            .contains(&self.processor.to_lowercase())
        {
            Ok(())
        } else {
            Err(RuleViolation::new(format!(
                "unsupported IBM Power version: {} is required",
                self.processor
            )))
        }
    }

    fn message(&self) -> String {
        format!(
            "System is running on IBM {} ({})",
            self.processor, self.required_arch
        )
    }

    fn level(&self) -> RuleLevel {
        RuleLevel::Error
    }
}
