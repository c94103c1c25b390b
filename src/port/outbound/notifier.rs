//! Notifier port for progress events.
//!
//! Events are advisory: they describe what the orchestrator is doing but are
//! not part of its contract. Nothing in the core depends on a notifier
//! observing them.

use crate::domain::{ComponentId, ContainerId, RunId, RunState};

/// Events emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A run began executing layers.
    RunStarted {
        run_id: RunId,
        template: String,
        layers: usize,
    },
    /// A layer began. `layer` is one-based.
    LayerStarted {
        layer: usize,
        components: Vec<ComponentId>,
    },
    /// A component task started.
    ComponentStarted { component: ComponentId },
    /// Devices were assigned to a container of a component.
    DevicesAllocated {
        component: ComponentId,
        container: String,
        addresses: String,
    },
    /// The runtime accepted a component's rendered spec.
    ComponentDeployed {
        component: ComponentId,
        containers: usize,
    },
    /// A deployed container is ready. `waited` is false when no health check
    /// was configured.
    ContainerReady {
        component: ComponentId,
        container: ContainerId,
        waited: bool,
    },
    /// A component task failed.
    ComponentFailed {
        component: ComponentId,
        reason: String,
    },
    /// Every component in a layer succeeded.
    LayerCompleted { layer: usize },
    /// At least one component in a layer failed; the run stops here.
    LayerFailed {
        layer: usize,
        failed: Vec<ComponentId>,
    },
    /// The run reached a terminal state.
    RunFinished { state: RunState },
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe (`Send + Sync`): component tasks emit
/// events concurrently. `notify` should return quickly.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}
