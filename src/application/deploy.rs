//! End-to-end deployment of one application.
//!
//! Everything that can fail for configuration or capacity reasons is checked
//! before the first layer runs: preflight rules, template layout, annotation
//! schema, device capacity, host tuning, models, and images.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use super::allocator::{check_sufficient, DeviceAllocator};
use super::demand::{build_catalog, ResourceDemand};
use super::executor::{DeployContext, LayerExecutor};
use super::image::{pull_missing, rendered_images, RetryPolicy};
use super::model::download_models;
use super::params::{apply_overrides, ParameterBuilder};
use super::preflight::run_preflight;
use super::tuning::apply_smt_target_off_worker;
use crate::domain::{
    ApplicationTemplate, ComponentCatalog, ComponentId, GlobalParams, RunId, RunState,
    TemplateMetadata,
};
use crate::error::{ConfigError, Error, Result};
use crate::port::{
    ContainerRuntime, DeviceDiscovery, Event, HostTuner, ModelStore, NotifierRegistry,
    RenderableSpec, RuleRegistry, TemplateRepository,
};

/// A template loaded and validated, ready to plan or deploy.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub metadata: TemplateMetadata,
    pub template: ApplicationTemplate,
    pub specs: BTreeMap<ComponentId, RenderableSpec>,
    pub catalog: ComponentCatalog,
    pub values: serde_json::Value,
}

/// Find a template by name, ignoring ASCII case.
pub async fn resolve_template(repo: &dyn TemplateRepository, name: &str) -> Result<String> {
    repo.list_templates(true)
        .await?
        .into_iter()
        .find(|t| t.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            ConfigError::UnknownTemplate {
                name: name.to_string(),
            }
            .into()
        })
}

/// Resolve, load, and validate a template and all of its components.
pub async fn load_template(repo: &dyn TemplateRepository, name: &str) -> Result<LoadedTemplate> {
    let name = resolve_template(repo, name).await?;
    let metadata = repo.load_metadata(&name).await?;
    let specs = repo.load_component_specs(&name).await?;
    let values = repo.load_values(&name).await?;

    let shipped: BTreeSet<_> = specs.keys().cloned().collect();
    let template = ApplicationTemplate::from_metadata(&metadata, &shipped)
        .map_err(ConfigError::from)?;
    let catalog = build_catalog(specs.values())?;

    Ok(LoadedTemplate {
        metadata,
        template,
        specs,
        catalog,
        values,
    })
}

/// What the caller asked to deploy.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub app_name: String,
    pub template: String,
    /// `dotted.key` to value overrides of the template defaults.
    pub value_overrides: BTreeMap<String, String>,
    /// Port name to host port.
    pub host_ports: BTreeMap<String, u16>,
    /// Preflight rules to skip, by name.
    pub skip_checks: Vec<String>,
    pub pull_images: bool,
    /// Fetch the template's models before the first layer.
    pub download_models: bool,
}

/// Tunables for a run.
#[derive(Debug, Clone, Copy)]
pub struct DeploySettings {
    pub max_parallel: usize,
    pub retry: RetryPolicy,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            max_parallel: num_cpus::get().max(1),
            retry: RetryPolicy::default(),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub run_id: RunId,
    pub template: String,
    pub state: RunState,
    pub layers: usize,
    pub components: usize,
    pub devices_allocated: usize,
    pub images_pulled: Vec<String>,
    pub models_downloaded: Vec<String>,
}

/// Deploys applications from templates.
pub struct DeployService {
    templates: Arc<dyn TemplateRepository>,
    runtime: Arc<dyn ContainerRuntime>,
    discovery: Arc<dyn DeviceDiscovery>,
    rules: RuleRegistry,
    tuner: Option<Arc<dyn HostTuner>>,
    models: Option<Arc<dyn ModelStore>>,
    notifiers: Arc<NotifierRegistry>,
    settings: DeploySettings,
}

impl DeployService {
    pub fn new(
        templates: Arc<dyn TemplateRepository>,
        runtime: Arc<dyn ContainerRuntime>,
        discovery: Arc<dyn DeviceDiscovery>,
    ) -> Self {
        Self {
            templates,
            runtime,
            discovery,
            rules: RuleRegistry::new(),
            tuner: None,
            models: None,
            notifiers: Arc::new(NotifierRegistry::new()),
            settings: DeploySettings::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_tuner(mut self, tuner: Arc<dyn HostTuner>) -> Self {
        self.tuner = Some(tuner);
        self
    }

    #[must_use]
    pub fn with_models(mut self, store: Arc<dyn ModelStore>) -> Self {
        self.models = Some(store);
        self
    }

    #[must_use]
    pub fn with_notifiers(mut self, notifiers: NotifierRegistry) -> Self {
        self.notifiers = Arc::new(notifiers);
        self
    }

    #[must_use]
    pub const fn with_settings(mut self, settings: DeploySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Deploy `request.template` as `request.app_name`.
    pub async fn deploy(&self, request: DeployRequest) -> Result<DeploySummary> {
        let run_id = RunId::generate();
        let span = info_span!("run", run_id = %run_id, app = %request.app_name);
        self.execute(run_id, request).instrument(span).await
    }

    async fn execute(&self, run_id: RunId, request: DeployRequest) -> Result<DeploySummary> {
        run_preflight(&self.rules, &request.skip_checks).into_result()?;

        let loaded = load_template(self.templates.as_ref(), &request.template).await?;
        let name = loaded.template.name().to_string();
        let demand = ResourceDemand::of(&loaded.catalog);
        let values = apply_overrides(loaded.values, &request.value_overrides)?;
        info!(
            template = %name,
            layers = loaded.template.layers().len(),
            components = loaded.catalog.len(),
            devices = demand.total(),
            "Template loaded"
        );

        let allocator = if demand.total() == 0 {
            DeviceAllocator::empty()
        } else {
            let pool = self.discovery.free_devices().await?;
            check_sufficient(demand.total(), pool.len())?;
            info!(required = demand.total(), available = pool.len(), "Device pool sufficient");
            DeviceAllocator::new(pool)
        };

        match (&self.tuner, loaded.template.host_tuning_target()) {
            (Some(tuner), target) => {
                apply_smt_target_off_worker(Arc::clone(tuner), target).await?;
            }
            (None, Some(smt_level)) => {
                warn!(smt_level, "No host tuner configured, SMT level left as is");
            }
            (None, None) => {}
        }

        let models_downloaded = match (&self.models, request.download_models) {
            (_, false) => Vec::new(),
            (Some(store), true) => {
                download_models(store.as_ref(), &loaded.metadata.models)
                    .await?
                    .downloaded
            }
            (None, true) => {
                if !loaded.metadata.models.is_empty() {
                    warn!(
                        models = loaded.metadata.models.len(),
                        "No model store configured, models not downloaded"
                    );
                }
                Vec::new()
            }
        };

        let globals = GlobalParams {
            app_name: request.app_name,
            app_template_name: name.clone(),
            version: loaded.template.version().to_string(),
            values,
        };

        let images_pulled = if request.pull_images {
            let images =
                rendered_images(self.templates.as_ref(), &loaded.specs, &globals).await?;
            pull_missing(self.runtime.as_ref(), &images, self.settings.retry).await?
        } else {
            Vec::new()
        };

        let layers = loaded.template.layers().to_vec();
        let components = loaded.catalog.len();
        self.notifiers.notify_all(Event::RunStarted {
            run_id: run_id.clone(),
            template: name.clone(),
            layers: layers.len(),
        });

        let context = DeployContext {
            runtime: Arc::clone(&self.runtime),
            templates: Arc::clone(&self.templates),
            specs: loaded.specs,
            catalog: loaded.catalog,
            allocator,
            params: ParameterBuilder::new(globals, request.host_ports),
            notifiers: Arc::clone(&self.notifiers),
        };
        let outcome = LayerExecutor::new(context, self.settings.max_parallel)
            .run(&layers)
            .await;
        let state = outcome.state;
        outcome.into_result().map_err(Error::from)?;

        info!(state = %state, "Run finished");
        Ok(DeploySummary {
            run_id,
            template: name,
            state,
            layers: layers.len(),
            components,
            devices_allocated: demand.total(),
            images_pulled,
            models_downloaded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::device::FixedDiscovery;
    use crate::testkit::domain::pod_yaml;
    use crate::testkit::model::RecordingModelStore;
    use crate::testkit::runtime::ScriptedRuntime;
    use crate::testkit::template::InMemoryTemplates;

    fn templates() -> InMemoryTemplates {
        InMemoryTemplates::new("Chat")
            .with_layers(&[&["x"], &["y"]])
            .with_component("x", &pod_yaml("x", &[("x-main", 1)]))
            .with_component("y", &pod_yaml("y", &[("y-main", 0)]))
    }

    fn service(runtime: Arc<ScriptedRuntime>, devices: &[&str]) -> DeployService {
        DeployService::new(
            Arc::new(templates()),
            runtime,
            Arc::new(FixedDiscovery::new(devices.iter().copied())),
        )
    }

    fn request(template: &str) -> DeployRequest {
        DeployRequest {
            app_name: "demo".into(),
            template: template.into(),
            ..DeployRequest::default()
        }
    }

    #[tokio::test]
    async fn template_names_match_case_insensitively() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let summary = service(runtime, &["d0"]).deploy(request("chat")).await.unwrap();

        assert_eq!(summary.template, "Chat");
        assert_eq!(summary.state, RunState::Done);
        assert_eq!(summary.devices_allocated, 1);
    }

    #[tokio::test]
    async fn unknown_template_is_a_config_error() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let err = service(runtime, &[]).deploy(request("nope")).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::UnknownTemplate { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_override_fails_before_deploying() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let mut request = request("chat");
        request
            .value_overrides
            .insert("missing.key".into(), "1".into());

        let err = service(runtime.clone(), &["d0"]).deploy(request).await.unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::InvalidParam { .. })));
        assert!(runtime.deployed_components().is_empty());
    }

    #[tokio::test]
    async fn pulled_images_honor_value_overrides() {
        let templates = InMemoryTemplates::new("Chat")
            .with_values(serde_json::json!({"server": {"image": "registry.local/server:1"}}))
            .with_component(
                "server",
                "spec:\n  containers:\n    - name: server\n      image: \"{{ .Values.server.image }}\"\n",
            );
        let runtime = Arc::new(ScriptedRuntime::new());
        let service = DeployService::new(
            Arc::new(templates),
            runtime.clone(),
            Arc::new(FixedDiscovery::new(std::iter::empty::<&str>())),
        );
        let mut request = request("chat");
        request.pull_images = true;
        request
            .value_overrides
            .insert("server.image".into(), "registry.local/server:2".into());

        let summary = service.deploy(request).await.unwrap();

        assert_eq!(summary.images_pulled, vec!["registry.local/server:2"]);
        assert_eq!(runtime.pulled_images(), vec!["registry.local/server:2"]);
        assert!(runtime
            .rendered_yaml("server")
            .unwrap()
            .contains("registry.local/server:2"));
    }

    #[tokio::test]
    async fn models_are_downloaded_before_the_first_layer() {
        let store = Arc::new(RecordingModelStore::new("/models").with_model("embed"));
        let runtime = Arc::new(ScriptedRuntime::new());
        let service = DeployService::new(
            Arc::new(templates().with_model("granite").with_model("embed")),
            runtime.clone(),
            Arc::new(FixedDiscovery::new(["d0"])),
        )
        .with_models(store.clone());
        let mut request = request("chat");
        request.download_models = true;

        let summary = service.deploy(request).await.unwrap();

        assert_eq!(summary.models_downloaded, vec!["granite"]);
        assert_eq!(store.downloads(), vec!["granite"]);
    }

    #[tokio::test]
    async fn failed_model_download_stops_before_deploying() {
        let store = Arc::new(RecordingModelStore::new("/models").with_failure("granite"));
        let runtime = Arc::new(ScriptedRuntime::new());
        let service = DeployService::new(
            Arc::new(templates().with_model("granite")),
            runtime.clone(),
            Arc::new(FixedDiscovery::new(["d0"])),
        )
        .with_models(store);
        let mut request = request("chat");
        request.download_models = true;

        let err = service.deploy(request).await.unwrap_err();

        assert!(matches!(err, Error::Model(_)));
        assert!(runtime.rendered_specs().is_empty());
    }

    #[tokio::test]
    async fn skipped_model_download_leaves_the_store_alone() {
        let store = Arc::new(RecordingModelStore::new("/models"));
        let service = DeployService::new(
            Arc::new(templates().with_model("granite")),
            Arc::new(ScriptedRuntime::new()),
            Arc::new(FixedDiscovery::new(["d0"])),
        )
        .with_models(store.clone());

        let summary = service.deploy(request("chat")).await.unwrap();

        assert!(summary.models_downloaded.is_empty());
        assert!(store.downloads().is_empty());
    }

    #[tokio::test]
    async fn images_are_pulled_before_deploying_when_requested() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let mut request = request("chat");
        request.pull_images = true;

        let summary = service(runtime.clone(), &["d0"]).deploy(request).await.unwrap();

        assert_eq!(summary.images_pulled.len(), 2);
        assert_eq!(runtime.pulled_images().len(), 2);
    }
}
