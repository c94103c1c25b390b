//! Readiness verification for deployed containers.
//!
//! A container is ready when its health check passes. Containers without a
//! health check are ready as soon as they exist.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::ContainerId;
use crate::error::ComponentError;
use crate::port::{ContainerHealth, ContainerRuntime};

/// Grace period added to a health check's start period.
pub const READINESS_GRACE: Duration = Duration::from_secs(5 * 60);

/// How long to wait for a container whose health check starts after `start_period`.
#[must_use]
pub fn readiness_timeout(start_period: Duration) -> Duration {
    start_period + READINESS_GRACE
}

/// How a container became ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// No health check configured; no wait was performed.
    Immediate,
    /// The health check passed within `timeout`.
    Healthy { timeout: Duration },
}

impl Readiness {
    #[must_use]
    pub const fn waited(self) -> bool {
        matches!(self, Self::Healthy { .. })
    }
}

/// Checks deployed containers against their health checks.
pub struct ReadinessVerifier {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ReadinessVerifier {
    #[must_use]
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    /// Block until `container` is ready or its timeout elapses.
    pub async fn verify(&self, container: &ContainerId) -> Result<Readiness, ComponentError> {
        let health = self
            .runtime
            .inspect_container(container)
            .await
            .map_err(|source| ComponentError::Inspect {
                container: container.clone(),
                source,
            })?;

        match health {
            ContainerHealth::NotConfigured => {
                debug!(container = %container, "No health check configured, ready");
                Ok(Readiness::Immediate)
            }
            ContainerHealth::Configured { start_period } => {
                let timeout = readiness_timeout(start_period);
                info!(
                    container = %container,
                    timeout_secs = timeout.as_secs(),
                    "Waiting for container to become healthy"
                );
                self.runtime.wait_for_healthy(container, timeout).await?;
                Ok(Readiness::Healthy { timeout })
            }
        }
    }
}
