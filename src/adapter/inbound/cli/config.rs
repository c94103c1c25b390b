//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::operator::{operator, read_config_toml};
use crate::adapter::inbound::cli::output;
use crate::error::Result;

/// Execute `config show`.
pub fn execute_show(config_toml: &str) -> Result<()> {
    let view = operator().show_config(config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "config": view.document,
        }));
        return Ok(());
    }

    output::section("Effective configuration");
    output::lines(&view.toml);
    Ok(())
}

/// Execute `config validate`.
///
/// Unlike other commands, a missing file is an error here.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config_toml = read_config_toml(path)?;
    let report = operator().validate_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "warnings": report.warnings,
        }));
        return Ok(());
    }

    output::section("Config validation");
    output::field("Path", path.display());
    output::field("Templates", report.template_root.display());
    output::field("Devices", &report.device_source);
    output::field("Models", report.model_directory.display());
    for warning in &report.warnings {
        output::note(&format!("warning: {warning}"));
    }
    output::success("Configuration is valid");
    Ok(())
}
