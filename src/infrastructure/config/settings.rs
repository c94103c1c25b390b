//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to its defaults. `STRATA_TEMPLATE_ROOT` overrides the
//! template root from the file.
//!
//! # Example
//!
//! ```no_run
//! use strata::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::devices::{DeviceSource, DevicesConfig};
use super::logging::LoggingConfig;
use super::preflight::PreflightConfig;
use crate::application::{DeploySettings, RetryPolicy};
use crate::error::{ConfigError, Result};
use crate::infrastructure::paths;

/// Environment variable overriding `templates.root`.
pub const TEMPLATE_ROOT_ENV: &str = "STRATA_TEMPLATE_ROOT";

/// `[templates]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub root: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            root: paths::default_template_root(),
        }
    }
}

/// `[runtime]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Container engine binary.
    pub binary: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: "podman".into(),
        }
    }
}

/// `[orchestrator]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Component tasks of one layer allowed to run at once.
    pub max_parallel_components: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_parallel_components: num_cpus::get().max(1),
        }
    }
}

/// `[images]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Pull missing images before deploying.
    pub pull: bool,
    /// Attempts per image, including the first.
    pub retry_count: u32,
    pub retry_interval_secs: u64,
}

impl ImagesConfig {
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_count,
            interval: Duration::from_secs(self.retry_interval_secs),
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            pull: true,
            retry_count: 3,
            retry_interval_secs: 5,
        }
    }
}

/// `[models]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Download a template's models before deploying.
    pub download: bool,
    /// Host directory models are stored under.
    pub directory: PathBuf,
    /// Image that carries the model download tooling.
    pub tool_image: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            download: true,
            directory: PathBuf::from("/var/lib/strata/models"),
            tool_image: "icr.io/ai-services-cicd/tools:0.3".into(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub preflight: PreflightConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(root) = std::env::var(TEMPLATE_ROOT_ENV) {
            if !root.is_empty() {
                self.templates.root = PathBuf::from(root);
            }
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.templates.root.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "templates.root",
            }
            .into());
        }
        if self.runtime.binary.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "runtime.binary",
            }
            .into());
        }
        if self.orchestrator.max_parallel_components == 0 {
            return Err(ConfigError::InvalidValue {
                field: "orchestrator.max_parallel_components",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.preflight.numa_affinity_threshold > 100 {
            return Err(ConfigError::InvalidValue {
                field: "preflight.numa_affinity_threshold",
                reason: "must be between 0 and 100".to_string(),
            }
            .into());
        }
        if self.images.retry_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "images.retry_count",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.models.directory.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "models.directory",
            }
            .into());
        }
        if self.models.tool_image.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "models.tool_image",
            }
            .into());
        }
        if self.devices.source == DeviceSource::Fixed {
            let mut seen = std::collections::BTreeSet::new();
            if let Some(dup) = self.devices.addresses.iter().find(|a| !seen.insert(*a)) {
                return Err(ConfigError::InvalidValue {
                    field: "devices.addresses",
                    reason: format!("address '{dup}' listed twice"),
                }
                .into());
            }
        } else if self.devices.vendor_id.is_empty() || self.devices.device_id.is_empty() {
            return Err(ConfigError::MissingField {
                field: "devices.vendor_id / devices.device_id",
            }
            .into());
        }
        Ok(())
    }

    /// Run tunables for the deploy service.
    #[must_use]
    pub fn deploy_settings(&self) -> DeploySettings {
        DeploySettings {
            max_parallel: self.orchestrator.max_parallel_components,
            retry: self.images.retry_policy(),
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                field: "config",
                reason: e.to_string(),
            }
            .into()
        })
    }
}
