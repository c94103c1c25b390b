//! Host diagnostics for operator-facing adapters.

use crate::error::Result;
use crate::port::PreflightReport;

/// Diagnostics use-cases for operator-facing adapters.
pub trait DiagnosticOperator: Send + Sync {
    /// Run every configured preflight rule not named in `skip`.
    ///
    /// The report comes back even when rules fail; callers decide whether
    /// blocking failures are an error.
    fn check_host(&self, config_toml: &str, skip: &[String]) -> Result<PreflightReport>;
}
