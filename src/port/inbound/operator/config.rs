//! Configuration projections for operator-facing adapters.

use std::path::PathBuf;

use crate::error::Result;

/// Effective configuration, defaults applied.
#[derive(Debug, Clone)]
pub struct ConfigView {
    /// Rendered as TOML.
    pub toml: String,
    /// The same configuration as a JSON document.
    pub document: serde_json::Value,
}

/// Validation output for `config validate`.
#[derive(Debug, Clone, Default)]
pub struct ConfigValidationReport {
    pub template_root: PathBuf,
    pub device_source: String,
    pub model_directory: PathBuf,
    /// Problems that do not make the file invalid.
    pub warnings: Vec<String>,
}

/// Configuration use-cases for operator-facing adapters.
pub trait ConfigurationOperator: Send + Sync {
    /// Configuration file read when none is given.
    fn default_config_path(&self) -> PathBuf;

    /// Install logging from `[logging]`, raised by `verbosity`.
    ///
    /// Falls back to default logging when the configuration does not parse,
    /// so the parse error itself can still be reported.
    fn init_logging(&self, config_toml: &str, verbosity: u8);

    /// Build a projection for `config show`.
    fn show_config(&self, config_toml: &str) -> Result<ConfigView>;

    /// Validate config and return non-fatal warnings.
    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport>;
}
