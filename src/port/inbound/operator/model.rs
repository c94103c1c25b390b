//! Model projections for operator-facing adapters.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Which template's models, and where they live.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    pub template: String,

    /// Override for `models.directory`.
    pub directory: Option<PathBuf>,

    /// Override for `models.tool_image`.
    pub tool_image: Option<String>,
}

/// Whether one model is in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub model: String,
    pub present: bool,
}

/// Output for `models list`.
#[derive(Debug, Clone)]
pub struct ModelListing {
    pub template: String,
    pub directory: PathBuf,
    pub models: Vec<ModelEntry>,
}

/// Output for `models download`.
#[derive(Debug, Clone)]
pub struct ModelDownloadReport {
    pub template: String,
    pub directory: PathBuf,
    pub downloaded: Vec<String>,
    pub present: Vec<String>,
}

/// Model use-cases for operator-facing adapters.
#[async_trait]
pub trait ModelOperator: Send + Sync {
    /// Models a template serves and whether each is stored.
    async fn list_models(&self, request: &ModelRequest) -> Result<ModelListing>;

    /// Download every model a template serves that is not yet stored.
    async fn download_models(&self, request: &ModelRequest) -> Result<ModelDownloadReport>;
}
