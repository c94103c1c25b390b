//! Deployment use case for operator-facing adapters.

use async_trait::async_trait;

use crate::domain::{RunId, RunState};
use crate::error::Result;
use crate::port::Notifier;

/// Everything `create` was asked to do.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Application name, exposed to templates as `AppName`.
    pub app_name: String,

    /// Template name, matched case-insensitively.
    pub template: String,

    /// `dotted.key` value overrides.
    pub params: Vec<(String, String)>,

    /// Port name to host port.
    pub publish: Vec<(String, u16)>,

    /// Preflight rules to skip on top of the configured ones.
    pub skip_validation: Vec<String>,

    pub skip_image_pull: bool,

    pub skip_model_download: bool,
}

/// Outcome of a successful deployment.
#[derive(Debug, Clone)]
pub struct DeploymentView {
    pub run_id: RunId,
    pub template: String,
    pub state: RunState,
    pub layers: usize,
    pub components: usize,
    pub devices_allocated: usize,
    pub images_pulled: Vec<String>,
    pub models_downloaded: Vec<String>,
}

/// Deployment use-cases for operator-facing adapters.
#[async_trait]
pub trait DeploymentOperator: Send + Sync {
    /// Deploy an application, reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// Returns the first preflight, template, capacity, tuning, model, or
    /// image error, or the layer that failed.
    async fn create(
        &self,
        request: CreateRequest,
        progress: Box<dyn Notifier>,
    ) -> Result<DeploymentView>;
}
