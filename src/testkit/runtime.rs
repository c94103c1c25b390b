//! Scripted container runtime for orchestration tests.
//!
//! Deploys succeed by default: every container in the rendered manifest is
//! reported back under its own name, and the pod takes the component's name.
//! Builders script health checks, failures, and delays per container or
//! component.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ComponentId, ContainerId, DeployOptions, PodId, PodManifest};
use crate::error::{ReadinessError, RuntimeError};
use crate::port::{
    ConcreteSpec, ContainerHealth, ContainerRuntime, DeployReport, ImageSummary, PodReport,
};

/// One runtime call, as recorded in [`ScriptedRuntime::call_log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    DeployStarted(ComponentId),
    WaitFinished(ContainerId),
}

/// In-memory [`ContainerRuntime`].
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    health: BTreeMap<String, Duration>,
    wait_timeouts: BTreeSet<String>,
    deploy_failures: BTreeSet<String>,
    deploy_delay: Duration,
    wait_delay: Duration,
    images: Vec<ImageSummary>,
    pull_failures: BTreeMap<String, usize>,

    deployed: Mutex<Vec<ComponentId>>,
    options: Mutex<Vec<(ComponentId, DeployOptions)>>,
    specs: Mutex<Vec<ConcreteSpec>>,
    waits: Mutex<Vec<(ContainerId, Duration)>>,
    pulls: Mutex<Vec<String>>,
    attempts: Mutex<BTreeMap<String, usize>>,
    calls: Mutex<Vec<RuntimeCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `container` a health check with `start_period`.
    #[must_use]
    pub fn with_health(mut self, container: &str, start_period: Duration) -> Self {
        self.health.insert(container.to_string(), start_period);
        self
    }

    /// Make waiting on `container` time out.
    #[must_use]
    pub fn with_wait_timeout(mut self, container: &str) -> Self {
        self.wait_timeouts.insert(container.to_string());
        self
    }

    /// Reject every deploy of `component`.
    #[must_use]
    pub fn with_deploy_failure(mut self, component: &str) -> Self {
        self.deploy_failures.insert(component.to_string());
        self
    }

    /// Hold each deploy call for `delay`.
    #[must_use]
    pub const fn with_deploy_delay(mut self, delay: Duration) -> Self {
        self.deploy_delay = delay;
        self
    }

    /// Hold each health wait for `delay` before it returns.
    #[must_use]
    pub const fn with_wait_delay(mut self, delay: Duration) -> Self {
        self.wait_delay = delay;
        self
    }

    /// Report `image` as present locally.
    #[must_use]
    pub fn with_image(mut self, image: ImageSummary) -> Self {
        self.images.push(image);
        self
    }

    /// Fail the first `failures` pulls of `image`.
    #[must_use]
    pub fn with_pull_failures(mut self, image: &str, failures: usize) -> Self {
        self.pull_failures.insert(image.to_string(), failures);
        self
    }

    /// Components whose deploy succeeded, in completion order.
    pub fn deployed_components(&self) -> Vec<ComponentId> {
        self.deployed.lock().clone()
    }

    /// Options passed with each successful deploy.
    pub fn deploy_options(&self) -> Vec<(ComponentId, DeployOptions)> {
        self.options.lock().clone()
    }

    /// Rendered specs received, successful or not.
    pub fn rendered_specs(&self) -> Vec<ConcreteSpec> {
        self.specs.lock().clone()
    }

    /// Rendered YAML received for `component`, if any.
    pub fn rendered_yaml(&self, component: &str) -> Option<String> {
        self.specs
            .lock()
            .iter()
            .find(|s| s.component.as_str() == component)
            .map(|s| s.yaml.clone())
    }

    /// Every health wait requested, with its timeout.
    pub fn wait_calls(&self) -> Vec<(ContainerId, Duration)> {
        self.waits.lock().clone()
    }

    /// Highest number of deploy calls observed in flight at once.
    pub fn max_concurrent_deploys(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Deploy starts and wait completions, interleaved in the order they happened.
    pub fn call_log(&self) -> Vec<RuntimeCall> {
        self.calls.lock().clone()
    }

    /// Images pulled successfully.
    pub fn pulled_images(&self) -> Vec<String> {
        self.pulls.lock().clone()
    }

    /// Pull attempts made for `image`, failed ones included.
    pub fn pull_attempts(&self, image: &str) -> usize {
        self.attempts.lock().get(image).copied().unwrap_or(0)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContainerRuntime for ScriptedRuntime {
    async fn deploy(
        &self,
        spec: &ConcreteSpec,
        options: &DeployOptions,
    ) -> Result<DeployReport, RuntimeError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.calls
            .lock()
            .push(RuntimeCall::DeployStarted(spec.component.clone()));
        self.specs.lock().push(spec.clone());
        if !self.deploy_delay.is_zero() {
            tokio::time::sleep(self.deploy_delay).await;
        }

        if self.deploy_failures.contains(spec.component.as_str()) {
            return Err(RuntimeError::Rejected(format!(
                "scripted failure for {}",
                spec.component
            )));
        }

        let manifest =
            PodManifest::from_yaml(&spec.yaml).map_err(|e| RuntimeError::Parse(e.to_string()))?;
        let containers = manifest
            .spec
            .containers
            .iter()
            .map(|c| ContainerId::from(c.name.as_str()))
            .collect();

        self.deployed.lock().push(spec.component.clone());
        self.options
            .lock()
            .push((spec.component.clone(), options.clone()));
        Ok(DeployReport {
            pods: vec![PodReport {
                id: PodId::new(spec.component.as_str()),
                containers,
            }],
        })
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, RuntimeError> {
        Ok(self.images.clone())
    }

    async fn pull_image(&self, reference: &str) -> Result<(), RuntimeError> {
        let attempt = {
            let mut attempts = self.attempts.lock();
            let count = attempts.entry(reference.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        let failures = self.pull_failures.get(reference).copied().unwrap_or(0);
        if attempt <= failures {
            return Err(RuntimeError::CommandFailed {
                command: format!("pull {reference}"),
                status: Some(125),
                stderr: "scripted pull failure".into(),
            });
        }
        self.pulls.lock().push(reference.to_string());
        Ok(())
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerHealth, RuntimeError> {
        Ok(match self.health.get(id.as_str()) {
            Some(start_period) => ContainerHealth::Configured {
                start_period: *start_period,
            },
            None => ContainerHealth::NotConfigured,
        })
    }

    async fn wait_for_healthy(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ReadinessError> {
        self.waits.lock().push((id.clone(), timeout));
        if !self.wait_delay.is_zero() {
            tokio::time::sleep(self.wait_delay).await;
        }
        self.calls
            .lock()
            .push(RuntimeCall::WaitFinished(id.clone()));
        if self.wait_timeouts.contains(id.as_str()) {
            return Err(ReadinessError::Timeout {
                container: id.clone(),
                timeout,
            });
        }
        Ok(())
    }
}
