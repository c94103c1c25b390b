//! LPAR NUMA affinity check.

use std::path::PathBuf;

use crate::port::{Rule, RuleLevel, RuleViolation};

pub const LPARCFG_PATH: &str = "/proc/ppc64/lparcfg";

/// Warns when the partition's affinity score is below a threshold.
#[derive(Debug, Clone)]
pub struct NumaRule {
    path: PathBuf,
    threshold: u32,
}

impl NumaRule {
    pub fn new(threshold: u32) -> Self {
        Self::with_path(LPARCFG_PATH, threshold)
    }

    pub fn with_path(path: impl Into<PathBuf>, threshold: u32) -> Self {
        Self {
            path: path.into(),
            threshold,
        }
    }
}

/// Extract `affinity_score=<n>` from lparcfg contents.
#[must_use]
pub fn parse_affinity(lparcfg: &str) -> Option<u32> {
    lparcfg
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim().contains("affinity"))
        .and_then(|(_, value)| value.trim().parse().ok())
}

impl Rule for NumaRule {
    fn name(&self) -> &'static str {
        "numa"
    }

    fn verify(&self) -> Result<(), RuleViolation> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            RuleViolation::new(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let score = parse_affinity(&text)
            .ok_or_else(|| RuleViolation::new("no affinity score in lparcfg"))?;
        if score < self.threshold {
            return Err(RuleViolation::new(format!(
                "LPAR affinity score {score} is below the threshold {}",
                self.threshold
            )));
        }
        Ok(())
    }

    fn message(&self) -> String {
        format!("LPAR affinity score is above the threshold {}", self.threshold)
    }

    fn level(&self) -> RuleLevel {
        RuleLevel::Warning
    }

    fn hint(&self) -> Option<String> {
        Some(format!(
            "Rebalance the LPAR so its affinity score reaches {}",
            self.threshold
        ))
    }
}
