//! Container image preparation.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{ComponentCatalog, ComponentId, GlobalParams, PodManifest, RenderParams};
use crate::error::{RuntimeError, TemplateError};
use crate::port::{ContainerRuntime, RenderableSpec, TemplateRepository};

/// Retry settings for image pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per image, including the first.
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval: Duration::from_secs(5),
        }
    }
}

/// Unique images referenced by every container of every component.
#[must_use]
pub fn required_images(catalog: &ComponentCatalog) -> BTreeSet<String> {
    catalog
        .iter()
        .flat_map(|spec| spec.containers().iter())
        .map(|c| c.image.clone())
        .filter(|image| !image.is_empty())
        .collect()
}

/// Unique images a run will deploy, read from every spec rendered with the
/// run's values.
///
/// Values may carry image references, so a `--params` override changes what
/// has to be pulled. Device addresses are not known yet and render empty.
pub async fn rendered_images(
    repo: &dyn TemplateRepository,
    specs: &BTreeMap<ComponentId, RenderableSpec>,
    globals: &GlobalParams,
) -> Result<BTreeSet<String>, TemplateError> {
    let params = RenderParams {
        app_name: globals.app_name.clone(),
        app_template_name: globals.app_template_name.clone(),
        version: globals.version.clone(),
        values: globals.values.clone(),
        env: BTreeMap::new(),
    };

    let mut images = BTreeSet::new();
    for spec in specs.values() {
        let rendered = repo.render(spec, &params).await?;
        let manifest =
            PodManifest::from_yaml(&rendered.yaml).map_err(|source| TemplateError::Manifest {
                component: spec.id.clone(),
                source,
            })?;
        images.extend(
            manifest
                .spec
                .containers
                .into_iter()
                .map(|c| c.image)
                .filter(|image| !image.is_empty()),
        );
    }
    debug!(images = images.len(), "Resolved images from rendered specs");
    Ok(images)
}

/// Images from `required` not present locally.
pub async fn missing_images(
    runtime: &dyn ContainerRuntime,
    required: &BTreeSet<String>,
) -> Result<Vec<String>, RuntimeError> {
    let local = runtime.list_images().await?;
    Ok(required
        .iter()
        .filter(|image| !local.iter().any(|l| l.matches(image)))
        .cloned()
        .collect())
}

/// Pull every missing image, retrying each per `policy`.
///
/// Returns the images that were pulled.
pub async fn pull_missing(
    runtime: &dyn ContainerRuntime,
    required: &BTreeSet<String>,
    policy: RetryPolicy,
) -> Result<Vec<String>, RuntimeError> {
    let missing = missing_images(runtime, required).await?;
    if missing.is_empty() {
        info!(images = required.len(), "All images present");
        return Ok(missing);
    }

    for image in &missing {
        pull_with_retry(runtime, image, policy).await?;
    }
    Ok(missing)
}

async fn pull_with_retry(
    runtime: &dyn ContainerRuntime,
    image: &str,
    policy: RetryPolicy,
) -> Result<(), RuntimeError> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        info!(image, attempt, "Pulling image");
        match runtime.pull_image(image).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                warn!(image, attempt, error = %e, "Image pull failed, retrying");
                tokio::time::sleep(policy.interval).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
