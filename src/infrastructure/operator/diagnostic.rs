//! Diagnostic operator implementation.

use crate::application::run_preflight;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::inbound::operator::diagnostic::DiagnosticOperator;
use crate::port::PreflightReport;

use super::entry::Operator;

impl DiagnosticOperator for Operator {
    fn check_host(&self, config_toml: &str, skip: &[String]) -> Result<PreflightReport> {
        let config = Config::parse_toml(config_toml)?;
        let registry = config.preflight.registry();
        Ok(run_preflight(&registry, &config.preflight.skips_with(skip)))
    }
}
