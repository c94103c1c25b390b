//! Model weights a template needs on the host.

use serde::Serialize;
use tracing::info;

use crate::error::ModelError;
use crate::port::ModelStore;

/// Where each of a template's models stands in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub model: String,
    pub present: bool,
}

/// What a download pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelReport {
    pub downloaded: Vec<String>,
    pub present: Vec<String>,
}

/// Presence of every model in `models`, in order.
pub async fn model_status(
    store: &dyn ModelStore,
    models: &[String],
) -> Result<Vec<ModelStatus>, ModelError> {
    let mut statuses = Vec::with_capacity(models.len());
    for model in models {
        statuses.push(ModelStatus {
            model: model.clone(),
            present: store.is_present(model).await?,
        });
    }
    Ok(statuses)
}

/// Download every model not yet in the store, one at a time.
///
/// Stops at the first failure.
pub async fn download_models(
    store: &dyn ModelStore,
    models: &[String],
) -> Result<ModelReport, ModelError> {
    let mut report = ModelReport::default();
    for model in models {
        if store.is_present(model).await? {
            info!(model = %model, "Model already present");
            report.present.push(model.clone());
            continue;
        }
        info!(model = %model, directory = %store.directory().display(), "Downloading model");
        store.download(model).await?;
        report.downloaded.push(model.clone());
    }
    Ok(report)
}
