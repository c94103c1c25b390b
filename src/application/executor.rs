//! Layer executor.
//!
//! Runs the layers of a template strictly in order. Inside a layer every
//! component gets its own task; the layer ends only when every task has
//! finished, and a failing layer stops the run before the next one starts.
//!
//! ```text
//! Pending -> Running(0) -> Running(1) -> ... -> Done
//!                 \             \
//!                  Failed(0)     Failed(1)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn, Instrument};

use super::allocator::DeviceAllocator;
use super::params::ParameterBuilder;
use super::readiness::ReadinessVerifier;
use crate::domain::{ComponentCatalog, ComponentId, Layer, LayerResult, RunState};
use crate::error::{ComponentError, ComponentFailure, LayerError};
use crate::port::{
    ContainerRuntime, Event, NotifierRegistry, RenderableSpec, TemplateRepository,
};

/// Everything a component task needs, shared read-only across tasks.
///
/// The allocator is the only piece with interior mutability.
pub struct DeployContext {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub templates: Arc<dyn TemplateRepository>,
    pub specs: BTreeMap<ComponentId, RenderableSpec>,
    pub catalog: ComponentCatalog,
    pub allocator: DeviceAllocator,
    pub params: ParameterBuilder,
    pub notifiers: Arc<NotifierRegistry>,
}

/// Terminal result of running every layer.
#[derive(Debug)]
pub struct RunOutcome {
    pub state: RunState,
    /// Layers that finished with every component ready.
    pub completed_layers: usize,
    /// The composite error of the failing layer, if any.
    pub error: Option<LayerError>,
}

impl RunOutcome {
    pub fn into_result(self) -> Result<(), LayerError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Executes layers for exactly one run.
pub struct LayerExecutor {
    context: Arc<DeployContext>,
    max_parallel: usize,
    state: RunState,
}

impl LayerExecutor {
    /// `max_parallel` caps how many component tasks of one layer run at once.
    #[must_use]
    pub fn new(context: DeployContext, max_parallel: usize) -> Self {
        Self {
            context: Arc::new(context),
            max_parallel: max_parallel.max(1),
            state: RunState::Pending,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Devices still unallocated.
    #[must_use]
    pub fn remaining_devices(&self) -> usize {
        self.context.allocator.remaining()
    }

    /// Run every layer in order, stopping at the first failing one.
    pub async fn run(mut self, layers: &[Layer]) -> RunOutcome {
        let mut completed_layers = 0;

        for layer in layers {
            self.state = RunState::Running(layer.index());
            let result = self.run_layer(layer).await;

            if let Err(err) = result.into_result() {
                self.state = RunState::Failed(layer.index());
                error!(
                    layer = err.layer,
                    failed = err.failures.len(),
                    "Layer failed, aborting run"
                );
                self.context.notifiers.notify_all(Event::LayerFailed {
                    layer: err.layer,
                    failed: err.failed_components().cloned().collect(),
                });
                self.finish();
                return RunOutcome {
                    state: self.state,
                    completed_layers,
                    error: Some(err),
                };
            }

            completed_layers += 1;
            info!(layer = layer.number(), "Layer completed");
            self.context.notifiers.notify_all(Event::LayerCompleted {
                layer: layer.number(),
            });
        }

        self.state = RunState::Done;
        self.finish();
        RunOutcome {
            state: self.state,
            completed_layers,
            error: None,
        }
    }

    fn finish(&self) {
        self.context
            .notifiers
            .notify_all(Event::RunFinished { state: self.state });
    }

    /// Fan out one task per component and wait for all of them.
    ///
    /// A failing task never cancels its siblings; every failure is collected.
    async fn run_layer(&self, layer: &Layer) -> LayerResult {
        info!(
            layer = layer.number(),
            components = layer.components().len(),
            "Starting layer"
        );
        self.context.notifiers.notify_all(Event::LayerStarted {
            layer: layer.number(),
            components: layer.components().to_vec(),
        });

        let permits = Arc::new(Semaphore::new(self.max_parallel));
        let handles: Vec<_> = layer
            .components()
            .iter()
            .map(|id| {
                let context = Arc::clone(&self.context);
                let permits = Arc::clone(&permits);
                let id = id.clone();
                let span = tracing::info_span!("component", component = %id);
                tokio::spawn(
                    async move {
                        let _permit = permits
                            .acquire_owned()
                            .await
                            .map_err(|e| ComponentError::Aborted(e.to_string()))?;
                        deploy_component(&context, &id).await
                    }
                    .instrument(span),
                )
            })
            .collect();

        let results = join_all(handles).await;

        let errors = layer
            .components()
            .iter()
            .zip(results)
            .filter_map(|(id, joined)| {
                let outcome = joined.unwrap_or_else(|e| Err(ComponentError::Aborted(e.to_string())));
                match outcome {
                    Ok(()) => None,
                    Err(error) => {
                        warn!(component = %id, error = %error, "Component failed");
                        self.context.notifiers.notify_all(Event::ComponentFailed {
                            component: id.clone(),
                            reason: error.to_string(),
                        });
                        Some(ComponentFailure {
                            component: id.clone(),
                            error,
                        })
                    }
                }
            })
            .collect();

        LayerResult {
            layer_index: layer.index(),
            errors,
        }
    }
}

/// Allocate, render, deploy, and verify one component.
async fn deploy_component(
    context: &DeployContext,
    id: &ComponentId,
) -> Result<(), ComponentError> {
    context
        .notifiers
        .notify_all(Event::ComponentStarted { component: id.clone() });

    let spec = context.catalog.get(id).ok_or(ComponentError::MissingSpec)?;
    let source = context.specs.get(id).ok_or(ComponentError::MissingSpec)?;

    // Components that need no devices never touch the allocator lock.
    let allocation = if spec.total_accelerators() == 0 {
        BTreeMap::new()
    } else {
        let allocation = context.allocator.allocate(&spec.accelerator_demand())?;
        for (container, addresses) in &allocation {
            info!(container = %container, addresses = %addresses, "Devices allocated");
            context.notifiers.notify_all(Event::DevicesAllocated {
                component: id.clone(),
                container: container.clone(),
                addresses: addresses.clone(),
            });
        }
        allocation
    };

    let params = context.params.build(spec, &allocation);
    let options = context.params.deploy_options(spec);

    let rendered = context
        .templates
        .render(source, &params)
        .await
        .map_err(ComponentError::Render)?;

    let report = context
        .runtime
        .deploy(&rendered, &options)
        .await
        .map_err(ComponentError::Deploy)?;
    let containers: Vec<_> = report.containers().cloned().collect();
    info!(containers = containers.len(), "Component deployed");
    context.notifiers.notify_all(Event::ComponentDeployed {
        component: id.clone(),
        containers: containers.len(),
    });

    let verifier = ReadinessVerifier::new(Arc::clone(&context.runtime));
    for container in containers {
        let readiness = verifier.verify(&container).await?;
        context.notifiers.notify_all(Event::ContainerReady {
            component: id.clone(),
            container,
            waited: readiness.waited(),
        });
    }

    Ok(())
}
