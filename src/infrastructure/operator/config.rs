//! Configuration operator implementation.

use std::path::PathBuf;

use crate::error::Result;
use crate::infrastructure::config::{Config, DeviceSource, LoggingConfig};
use crate::infrastructure::paths;
use crate::port::inbound::operator::config::{
    ConfigValidationReport, ConfigView, ConfigurationOperator,
};

use super::entry::Operator;

fn warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.templates.root.is_dir() {
        warnings.push(format!(
            "templates.root {} does not exist",
            config.templates.root.display()
        ));
    }

    if config.devices.source == DeviceSource::Fixed && config.devices.addresses.is_empty() {
        warnings.push(
            "devices.source is fixed but no addresses are listed; accelerator demands will fail"
                .to_string(),
        );
    }

    let known = config.preflight.registry().names();
    for name in &config.preflight.skip {
        if !known.iter().any(|k| *k == name.as_str()) {
            warnings.push(format!("preflight.skip names unknown rule '{name}'"));
        }
    }

    warnings
}

impl ConfigurationOperator for Operator {
    fn default_config_path(&self) -> PathBuf {
        paths::default_config()
    }

    fn init_logging(&self, config_toml: &str, verbosity: u8) {
        let logging = Config::parse_toml(config_toml)
            .map(|config| config.logging)
            .unwrap_or_else(|_| LoggingConfig::default());
        logging.with_verbosity(verbosity).init();
    }

    fn show_config(&self, config_toml: &str) -> Result<ConfigView> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigView {
            toml: config.to_toml()?,
            document: serde_json::to_value(&config)?,
        })
    }

    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport> {
        let config = Config::parse_toml(config_toml)?;

        Ok(ConfigValidationReport {
            warnings: warnings(&config),
            template_root: config.templates.root,
            device_source: format!("{:?}", config.devices.source).to_lowercase(),
            model_directory: config.models.directory,
        })
    }
}
