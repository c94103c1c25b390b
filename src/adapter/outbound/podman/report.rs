//! Parsers for podman command output.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{ContainerId, PodId};
use crate::error::RuntimeError;
use crate::port::{ContainerHealth, DeployReport, ImageSummary, PodReport};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Pod,
    Containers,
    Other,
}

/// Parse the `Pod:` / `Container:` listing printed by `podman kube play`.
pub fn parse_play_output(output: &str) -> Result<DeployReport, RuntimeError> {
    let mut pods: Vec<PodReport> = Vec::new();
    let mut section = Section::Other;

    for line in output.lines().map(str::trim) {
        if line.is_empty() {
            section = Section::Other;
            continue;
        }
        if let Some(header) = line.strip_suffix(':') {
            section = match header {
                "Pod" | "Pods" => Section::Pod,
                "Container" | "Containers" => Section::Containers,
                _ => Section::Other,
            };
            continue;
        }
        match section {
            Section::Pod => pods.push(PodReport {
                id: PodId::new(line),
                containers: Vec::new(),
            }),
            Section::Containers => {
                let pod = pods.last_mut().ok_or_else(|| {
                    RuntimeError::Parse(format!("container '{line}' listed before any pod"))
                })?;
                pod.containers.push(ContainerId::new(line));
            }
            Section::Other => {}
        }
    }

    if pods.is_empty() {
        return Err(RuntimeError::Parse("no pods in kube play output".into()));
    }
    Ok(DeployReport { pods })
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectEntry {
    #[serde(default)]
    config: InspectConfig,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    healthcheck: Option<Healthcheck>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Healthcheck {
    #[serde(default)]
    test: Vec<String>,
    /// Nanoseconds.
    #[serde(default)]
    start_period: u64,
}

/// Read the health-check configuration from `podman inspect` JSON.
///
/// A missing health check, an empty test, or a `NONE` test all mean no
/// health check is configured.
pub fn parse_inspect_output(output: &str) -> Result<ContainerHealth, RuntimeError> {
    let entries: Vec<InspectEntry> =
        serde_json::from_str(output).map_err(|e| RuntimeError::Parse(e.to_string()))?;
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| RuntimeError::Parse("inspect returned no containers".into()))?;

    Ok(match entry.config.healthcheck {
        Some(check) if !check.test.is_empty() && check.test[0] != "NONE" => {
            ContainerHealth::Configured {
                start_period: Duration::from_nanos(check.start_period),
            }
        }
        _ => ContainerHealth::NotConfigured,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    repo_tags: Option<Vec<String>>,
    #[serde(default)]
    names: Option<Vec<String>>,
    #[serde(default)]
    repo_digests: Option<Vec<String>>,
}

/// Parse `podman images --format json`.
pub fn parse_images_output(output: &str) -> Result<Vec<ImageSummary>, RuntimeError> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<ImageEntry> =
        serde_json::from_str(output).map_err(|e| RuntimeError::Parse(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|e| {
            let mut repo_tags = e.repo_tags.unwrap_or_default();
            for name in e.names.unwrap_or_default() {
                if !repo_tags.contains(&name) {
                    repo_tags.push(name);
                }
            }
            ImageSummary {
                id: e.id,
                repo_tags,
                repo_digests: e.repo_digests.unwrap_or_default(),
            }
        })
        .collect())
}
