//! Notifier that writes progress events to the tracing log.

use tracing::{error, info, warn};

use crate::port::{Event, Notifier};

/// Writes every event as a structured log line under the `strata::progress` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        match event {
            Event::RunStarted {
                run_id,
                template,
                layers,
            } => info!(target: "strata::progress", run_id = %run_id, template = %template, layers, "Run started"),
            Event::LayerStarted { layer, components } => info!(
                target: "strata::progress",
                layer,
                components = components.len(),
                "Layer started"
            ),
            Event::ComponentStarted { component } => {
                info!(target: "strata::progress", component = %component, "Component started");
            }
            Event::DevicesAllocated {
                component,
                container,
                addresses,
            } => info!(
                target: "strata::progress",
                component = %component,
                container = %container,
                addresses = %addresses,
                "Devices allocated"
            ),
            Event::ComponentDeployed {
                component,
                containers,
            } => info!(target: "strata::progress", component = %component, containers, "Component deployed"),
            Event::ContainerReady {
                component,
                container,
                waited,
            } => info!(
                target: "strata::progress",
                component = %component,
                container = %container,
                waited,
                "Container ready"
            ),
            Event::ComponentFailed { component, reason } => {
                warn!(target: "strata::progress", component = %component, reason = %reason, "Component failed");
            }
            Event::LayerCompleted { layer } => {
                info!(target: "strata::progress", layer, "Layer completed");
            }
            Event::LayerFailed { layer, failed } => {
                let failed = failed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                error!(target: "strata::progress", layer, failed = %failed, "Layer failed");
            }
            Event::RunFinished { state } => {
                info!(target: "strata::progress", state = %state, "Run finished");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComponentId, RunState};

    #[test]
    fn handles_every_event_without_a_subscriber() {
        let notifier = LogNotifier;
        notifier.notify(Event::LayerStarted {
            layer: 1,
            components: vec![ComponentId::from("x")],
        });
        notifier.notify(Event::LayerFailed {
            layer: 1,
            failed: vec![ComponentId::from("x"), ComponentId::from("y")],
        });
        notifier.notify(Event::RunFinished {
            state: RunState::Failed(0),
        });
    }
}
