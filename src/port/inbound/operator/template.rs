//! Template and image projections for operator-facing adapters.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// One row of `templates`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub version: String,
    pub layers: usize,
    pub components: usize,
    pub models: usize,
    pub description: String,
}

/// Output for `templates`.
#[derive(Debug, Clone)]
pub struct TemplateListing {
    pub root: PathBuf,
    pub templates: Vec<TemplateSummary>,
}

/// Whether one image is present locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStatus {
    pub image: String,
    pub present: bool,
}

/// Output for `images list`.
#[derive(Debug, Clone)]
pub struct ImageListing {
    pub template: String,
    pub images: Vec<ImageStatus>,
}

impl ImageListing {
    /// Images not present locally.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.images.iter().filter(|i| !i.present).count()
    }
}

/// Output for `images pull`.
#[derive(Debug, Clone)]
pub struct ImagePullReport {
    pub template: String,
    pub pulled: Vec<String>,
    /// Images that were already present.
    pub present: usize,
}

/// Template and image use-cases for operator-facing adapters.
#[async_trait]
pub trait TemplateOperator: Send + Sync {
    /// List templates under the configured root.
    async fn list_templates(&self, config_toml: &str, include_hidden: bool)
        -> Result<TemplateListing>;

    /// Images a template needs and whether each is present.
    async fn list_images(&self, config_toml: &str, template: &str) -> Result<ImageListing>;

    /// Pull every missing image a template needs.
    async fn pull_images(&self, config_toml: &str, template: &str) -> Result<ImagePullReport>;
}
