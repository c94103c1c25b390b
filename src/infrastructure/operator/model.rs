//! Model operator implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapter::outbound::podman::PodmanModelStore;
use crate::application::{download_models, load_template, model_status, LoadedTemplate};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::port::inbound::operator::model::{
    ModelDownloadReport, ModelEntry, ModelListing, ModelOperator, ModelRequest,
};

use super::entry::Operator;

/// Configuration with the request's overrides applied.
fn resolve(request: &ModelRequest) -> Result<Config> {
    let mut config = Config::parse_toml(&request.config_toml)?;
    if let Some(directory) = &request.directory {
        config.models.directory.clone_from(directory);
    }
    if let Some(image) = &request.tool_image {
        config.models.tool_image.clone_from(image);
    }
    Ok(config)
}

async fn open(request: &ModelRequest) -> Result<(LoadedTemplate, Arc<PodmanModelStore>, Config)> {
    let config = resolve(request)?;
    let templates = bootstrap::build_templates(&config);
    let loaded = load_template(templates.as_ref(), &request.template).await?;
    Ok((loaded, bootstrap::build_model_store(&config), config))
}

#[async_trait]
impl ModelOperator for Operator {
    async fn list_models(&self, request: &ModelRequest) -> Result<ModelListing> {
        let (loaded, store, config) = open(request).await?;
        let statuses = model_status(store.as_ref(), &loaded.metadata.models).await?;

        Ok(ModelListing {
            template: loaded.template.name().to_string(),
            directory: config.models.directory,
            models: statuses
                .into_iter()
                .map(|s| ModelEntry {
                    model: s.model,
                    present: s.present,
                })
                .collect(),
        })
    }

    async fn download_models(&self, request: &ModelRequest) -> Result<ModelDownloadReport> {
        let (loaded, store, config) = open(request).await?;
        let report = download_models(store.as_ref(), &loaded.metadata.models).await?;

        Ok(ModelDownloadReport {
            template: loaded.template.name().to_string(),
            directory: config.models.directory,
            downloaded: report.downloaded,
            present: report.present,
        })
    }
}
