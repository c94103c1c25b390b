//! Terminal progress for `create`.
//!
//! Prints one line per layer and component event above the spinner, or one
//! JSON line per event in JSON mode.

use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

use crate::adapter::inbound::cli::output;
use crate::port::{Event, Notifier};

/// Notifier that renders run progress for a human or a script.
pub struct ProgressNotifier {
    pb: ProgressBar,
}

impl ProgressNotifier {
    #[must_use]
    pub const fn new(pb: ProgressBar) -> Self {
        Self { pb }
    }
}

/// JSON payload for an event.
fn payload(event: &Event) -> Value {
    match event {
        Event::RunStarted {
            run_id,
            template,
            layers,
        } => json!({ "event": "run_started", "run_id": run_id, "template": template, "layers": layers }),
        Event::LayerStarted { layer, components } => {
            json!({ "event": "layer_started", "layer": layer, "components": components })
        }
        Event::ComponentStarted { component } => {
            json!({ "event": "component_started", "component": component })
        }
        Event::DevicesAllocated {
            component,
            container,
            addresses,
        } => json!({
            "event": "devices_allocated",
            "component": component,
            "container": container,
            "addresses": addresses,
        }),
        Event::ComponentDeployed {
            component,
            containers,
        } => json!({ "event": "component_deployed", "component": component, "containers": containers }),
        Event::ContainerReady {
            component,
            container,
            waited,
        } => json!({
            "event": "container_ready",
            "component": component,
            "container": container,
            "waited": waited,
        }),
        Event::ComponentFailed { component, reason } => {
            json!({ "event": "component_failed", "component": component, "reason": reason })
        }
        Event::LayerCompleted { layer } => json!({ "event": "layer_completed", "layer": layer }),
        Event::LayerFailed { layer, failed } => {
            json!({ "event": "layer_failed", "layer": layer, "failed": failed })
        }
        Event::RunFinished { state } => json!({ "event": "run_finished", "state": state.to_string() }),
    }
}

/// Human line for an event, or `None` for events too fine-grained to show.
fn line(event: &Event) -> Option<String> {
    match event {
        Event::LayerStarted { layer, components } => Some(format!(
            "{} {}",
            format!("Layer {layer}").bold(),
            components
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
                .dimmed()
        )),
        Event::DevicesAllocated {
            component,
            container,
            addresses,
        } => Some(format!(
            "  {} {component}/{container} {}",
            "devices".cyan(),
            addresses.dimmed()
        )),
        Event::ContainerReady {
            component,
            container,
            waited: true,
        } => Some(format!("  {} {component}/{container} healthy", "✓".green())),
        Event::ComponentDeployed { component, .. } => {
            Some(format!("  {} {component} deployed", "✓".green()))
        }
        Event::ComponentFailed { component, reason } => {
            Some(format!("  {} {component}: {reason}", "×".red()))
        }
        _ => None,
    }
}

impl Notifier for ProgressNotifier {
    fn notify(&self, event: Event) {
        if output::is_json() {
            output::event("progress", payload(&event));
            return;
        }
        if output::is_quiet() {
            return;
        }
        if let Some(line) = line(&event) {
            self.pb.println(format!("  {line}"));
        }
    }
}
