//! Container runtime port.
//!
//! The runtime client is the only collaborator that talks to the execution
//! engine. Everything the orchestrator knows about running containers comes
//! through this trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ContainerId, DeployOptions, PodId};
use crate::error::{ReadinessError, RuntimeError};

use super::template::ConcreteSpec;

/// Pods and containers created by a deploy call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub pods: Vec<PodReport>,
}

impl DeployReport {
    /// Every container across every pod, in report order.
    pub fn containers(&self) -> impl Iterator<Item = &ContainerId> {
        self.pods.iter().flat_map(|p| p.containers.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodReport {
    pub id: PodId,
    pub containers: Vec<ContainerId>,
}

/// Health-check configuration of a deployed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerHealth {
    /// No health check configured: the container is ready once created.
    NotConfigured,
    /// A health check with the given start period.
    Configured { start_period: Duration },
}

/// A locally available image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSummary {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub repo_digests: Vec<String>,
}

impl ImageSummary {
    /// Whether this image satisfies `reference` by tag or digest.
    #[must_use]
    pub fn matches(&self, reference: &str) -> bool {
        self.repo_tags.iter().any(|t| t == reference)
            || self.repo_digests.iter().any(|d| d == reference)
    }
}

/// Client for the container execution engine.
///
/// Implementations must be thread-safe: deploys within a layer run
/// concurrently against the same client.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Create (and optionally start) the pods described by `spec`.
    async fn deploy(
        &self,
        spec: &ConcreteSpec,
        options: &DeployOptions,
    ) -> Result<DeployReport, RuntimeError>;

    /// List locally available images.
    async fn list_images(&self) -> Result<Vec<ImageSummary>, RuntimeError>;

    /// Pull an image by reference.
    async fn pull_image(&self, reference: &str) -> Result<(), RuntimeError>;

    /// Read the health-check configuration of a container.
    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerHealth, RuntimeError>;

    /// Block until the container reports healthy, or fail once `timeout` elapses.
    async fn wait_for_healthy(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ReadinessError>;
}
