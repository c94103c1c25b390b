//! Host preflight rule port.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::error::PreflightError;

/// How a failing rule affects the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleLevel {
    /// Reported, but the run continues.
    Warning,
    /// Aborts the run before orchestration begins.
    Error,
}

impl fmt::Display for RuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Why a rule did not pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleViolation(pub String);

impl RuleViolation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// A single host check.
pub trait Rule: Send + Sync {
    /// Short, stable name used for skipping (`root`, `numa`, ...).
    fn name(&self) -> &'static str;

    /// Run the check.
    fn verify(&self) -> Result<(), RuleViolation>;

    /// Message shown when the rule passes.
    fn message(&self) -> String;

    fn level(&self) -> RuleLevel;

    /// Optional remediation hint shown when the rule fails.
    fn hint(&self) -> Option<String> {
        None
    }
}

/// Ordered collection of preflight rules.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: vec![] }
    }

    /// Register a rule.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Registered rules, in registration order.
    #[must_use]
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Names of every registered rule.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Result of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub name: &'static str,
    #[serde(serialize_with = "serialize_level")]
    pub level: RuleLevel,
    pub status: RuleStatus,
    /// Pass message, or the violation when the rule failed.
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

fn serialize_level<S: serde::Serializer>(level: &RuleLevel, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(level)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of every registered rule, in registration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreflightReport {
    pub outcomes: Vec<RuleOutcome>,
}

impl PreflightReport {
    /// Names of failed rules at error level.
    #[must_use]
    pub fn blocking_failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.status == RuleStatus::Failed && o.level == RuleLevel::Error)
            .map(|o| o.name.to_string())
            .collect()
    }

    /// Fail if any error-level rule failed. Warnings never block.
    pub fn into_result(self) -> Result<Self, PreflightError> {
        let failed = self.blocking_failures();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(PreflightError { failed })
        }
    }
}
