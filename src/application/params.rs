//! Parameter builder.
//!
//! Combines the run-wide globals with one component's device allocation and
//! declared ports into the render context and deploy options for that
//! component.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::{
    ComponentSpec, ContainerEnv, DeployOptions, GlobalParams, RenderParams, DEVICE_ENV_VAR,
};
use crate::error::ConfigError;

/// Builds per-component render parameters and deploy options.
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    globals: GlobalParams,
    /// Port name to user-requested host port.
    host_ports: BTreeMap<String, u16>,
}

impl ParameterBuilder {
    #[must_use]
    pub fn new(globals: GlobalParams, host_ports: BTreeMap<String, u16>) -> Self {
        Self {
            globals,
            host_ports,
        }
    }

    #[must_use]
    pub fn globals(&self) -> &GlobalParams {
        &self.globals
    }

    /// Build the render context for one component.
    ///
    /// `allocation` maps container name to its space-joined device addresses.
    /// The result owns copies of everything it holds, so concurrently built
    /// params never alias each other or the globals.
    #[must_use]
    pub fn build(
        &self,
        component: &ComponentSpec,
        allocation: &BTreeMap<String, String>,
    ) -> RenderParams {
        let env: ContainerEnv = component
            .containers()
            .iter()
            .map(|container| {
                let mut vars = BTreeMap::new();
                if let Some(addresses) = allocation.get(&container.name) {
                    vars.insert(DEVICE_ENV_VAR.to_string(), addresses.clone());
                }
                (container.name.clone(), vars)
            })
            .collect();

        RenderParams {
            app_name: self.globals.app_name.clone(),
            app_template_name: self.globals.app_template_name.clone(),
            version: self.globals.version.clone(),
            values: self.globals.values.clone(),
            env,
        }
    }

    /// Compute the runtime options for one component.
    ///
    /// Ports are visited container by container, in port-name order. A port
    /// with a user host-port override is published as `host:container`,
    /// otherwise as the bare container port.
    #[must_use]
    pub fn deploy_options(&self, component: &ComponentSpec) -> DeployOptions {
        let mut publish = String::new();
        for container in component.containers() {
            for (port_name, container_port) in &container.exposed_ports {
                match self.host_ports.get(port_name) {
                    Some(host_port) => {
                        publish.push_str(&format!("{host_port}:{container_port},"));
                    }
                    None => publish.push_str(&format!("{container_port},")),
                }
            }
        }

        DeployOptions {
            start: component.start(),
            publish,
        }
    }
}

/// Apply `key.path=value` overrides to the template's default values.
///
/// Every key must already exist in `values`. The override keeps the type of
/// the value it replaces when it parses as one.
pub fn apply_overrides(
    mut values: Value,
    overrides: &BTreeMap<String, String>,
) -> Result<Value, ConfigError> {
    for (key, raw) in overrides {
        let slot = key
            .split('.')
            .try_fold(&mut values, |node, segment| node.get_mut(segment))
            .ok_or_else(|| ConfigError::InvalidParam {
                key: key.clone(),
                reason: "no such value in the template".into(),
            })?;

        *slot = coerce(slot, raw).ok_or_else(|| ConfigError::InvalidParam {
            key: key.clone(),
            reason: format!("'{raw}' does not match the type of the default value"),
        })?;
    }
    Ok(values)
}

fn coerce(existing: &Value, raw: &str) -> Option<Value> {
    match existing {
        Value::Bool(_) => raw.parse::<bool>().ok().map(Value::Bool),
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            raw.parse::<i64>().ok().map(Value::from)
        }
        Value::Number(_) => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        Value::Object(_) | Value::Array(_) => None,
        Value::Null | Value::String(_) => Some(Value::String(raw.to_string())),
    }
}
