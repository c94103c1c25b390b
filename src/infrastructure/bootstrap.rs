//! Composition root: wires configured adapters into application services.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::device::{FixedDiscovery, SysfsDiscovery};
use crate::adapter::outbound::host::SmtTuner;
use crate::adapter::outbound::notifier::LogNotifier;
use crate::adapter::outbound::podman::{PodmanModelStore, PodmanRuntime};
use crate::adapter::outbound::template::FilesystemTemplates;
use crate::application::DeployService;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::DeviceSource;
use crate::port::{DeviceDiscovery, Notifier, NotifierRegistry};

/// Template repository rooted at `templates.root`.
#[must_use]
pub fn build_templates(config: &Config) -> Arc<FilesystemTemplates> {
    Arc::new(FilesystemTemplates::new(config.templates.root.clone()))
}

/// Container runtime client for `runtime.binary`.
#[must_use]
pub fn build_runtime(config: &Config) -> Arc<PodmanRuntime> {
    Arc::new(PodmanRuntime::new(config.runtime.binary.clone()))
}

/// Model store under `models.directory`, downloading through `models.tool_image`.
#[must_use]
pub fn build_model_store(config: &Config) -> Arc<PodmanModelStore> {
    Arc::new(PodmanModelStore::new(
        PodmanRuntime::new(config.runtime.binary.clone()),
        config.models.tool_image.clone(),
        config.models.directory.clone(),
    ))
}

/// Free-device discovery for the configured source.
#[must_use]
pub fn build_discovery(config: &Config) -> Arc<dyn DeviceDiscovery> {
    match config.devices.source {
        DeviceSource::Sysfs => Arc::new(SysfsDiscovery::new(config.devices.pci_match())),
        DeviceSource::Fixed => Arc::new(FixedDiscovery::new(config.devices.addresses.clone())),
    }
}

/// Log notifier plus any front-end notifiers.
#[must_use]
pub fn build_notifier_registry(extra: Vec<Box<dyn Notifier>>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    for notifier in extra {
        registry.register(notifier);
    }
    registry
}

/// Fully wired deploy service.
#[must_use]
pub fn build_deploy_service(config: &Config, notifiers: NotifierRegistry) -> DeployService {
    info!(
        templates = %config.templates.root.display(),
        runtime = %config.runtime.binary,
        devices = ?config.devices.source,
        max_parallel = config.orchestrator.max_parallel_components,
        models = %config.models.directory.display(),
        "Wiring deploy service"
    );

    DeployService::new(
        build_templates(config),
        build_runtime(config),
        build_discovery(config),
    )
    .with_rules(config.preflight.registry())
    .with_tuner(Arc::new(SmtTuner::default()))
    .with_models(build_model_store(config))
    .with_notifiers(notifiers)
    .with_settings(config.deploy_settings())
}
