//! Builders for domain primitives used across tests.

use std::fmt::Write;

use crate::domain::{ComponentId, Layer};

/// Pod manifest for `component` with one container per `(name, accelerators)`.
///
/// Each component gets its own image, `registry.local/<component>:latest`.
/// Containers with a zero count carry no accelerator annotation.
pub fn pod_yaml(component: &str, containers: &[(&str, usize)]) -> String {
    pod_yaml_with(component, containers, &[])
}

/// Like [`pod_yaml`], with extra pod annotations appended verbatim.
pub fn pod_yaml_with(
    component: &str,
    containers: &[(&str, usize)],
    annotations: &[(&str, &str)],
) -> String {
    let mut yaml = String::new();
    let _ = writeln!(yaml, "apiVersion: v1");
    let _ = writeln!(yaml, "kind: Pod");
    let _ = writeln!(yaml, "metadata:");
    let _ = writeln!(yaml, "  name: \"{{{{ .AppName }}}}-{component}\"");
    let _ = writeln!(yaml, "  annotations:");
    for (name, count) in containers {
        if *count > 0 {
            let _ = writeln!(yaml, "    strata.io/{name}--accelerators: \"{count}\"");
        }
    }
    for (key, value) in annotations {
        let _ = writeln!(yaml, "    {key}: \"{value}\"");
    }
    let _ = writeln!(yaml, "spec:");
    let _ = writeln!(yaml, "  containers:");
    for (name, _) in containers {
        let _ = writeln!(yaml, "    - name: {name}");
        let _ = writeln!(yaml, "      image: registry.local/{component}:latest");
    }
    yaml
}

/// Create a [`ComponentId`] from a string.
pub fn component(id: &str) -> ComponentId {
    ComponentId::from(id)
}

/// Layers from nested component names, indexed in order.
pub fn layers(ids: &[&[&str]]) -> Vec<Layer> {
    ids.iter()
        .enumerate()
        .map(|(i, layer)| Layer::new(i, layer.iter().map(|id| component(id)).collect()))
        .collect()
}
