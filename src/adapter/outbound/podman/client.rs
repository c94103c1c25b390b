//! Podman CLI client.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::report::{parse_images_output, parse_inspect_output, parse_play_output};
use crate::domain::{ContainerId, DeployOptions, StartPolicy};
use crate::error::{ReadinessError, RuntimeError};
use crate::port::{ConcreteSpec, ContainerHealth, ContainerRuntime, DeployReport, ImageSummary};

/// Drives podman through its command-line interface.
#[derive(Debug, Clone)]
pub struct PodmanRuntime {
    binary: String,
}

impl PodmanRuntime {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for `kube play` reading the spec from stdin.
    #[must_use]
    pub fn play_args(options: &DeployOptions) -> Vec<String> {
        let mut args = vec!["kube".to_string(), "play".to_string()];
        if let Some(start) = options.start {
            let flag = match start {
                StartPolicy::On => "--start=true",
                StartPolicy::Off => "--start=false",
            };
            args.push(flag.to_string());
        }
        for entry in options.publish_entries() {
            args.push(format!("--publish={entry}"));
        }
        args.push("-".to_string());
        args
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }

    pub(crate) async fn run(
        &self,
        args: &[String],
        stdin: Option<&str>,
    ) -> Result<String, RuntimeError> {
        let command = self.describe(args);
        debug!(command = %command, "Running podman");

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RuntimeError::Spawn {
                command: command.clone(),
                source,
            })?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input.as_bytes())
                .await
                .map_err(|source| RuntimeError::Spawn {
                    command: command.clone(),
                    source,
                })?;
            // Close stdin so podman sees end of input.
            drop(pipe);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| RuntimeError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RuntimeError::CommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_string()).collect()
}

#[async_trait]
impl ContainerRuntime for PodmanRuntime {
    async fn deploy(
        &self,
        spec: &ConcreteSpec,
        options: &DeployOptions,
    ) -> Result<DeployReport, RuntimeError> {
        let output = self
            .run(&Self::play_args(options), Some(spec.yaml.as_str()))
            .await?;
        parse_play_output(&output)
    }

    async fn list_images(&self) -> Result<Vec<ImageSummary>, RuntimeError> {
        let output = self.run(&strings(&["images", "--format", "json"]), None).await?;
        parse_images_output(&output)
    }

    async fn pull_image(&self, reference: &str) -> Result<(), RuntimeError> {
        self.run(&strings(&["pull", reference]), None).await?;
        Ok(())
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerHealth, RuntimeError> {
        let output = self
            .run(&strings(&["inspect", "--type", "container", id.as_str()]), None)
            .await?;
        parse_inspect_output(&output)
    }

    async fn wait_for_healthy(
        &self,
        id: &ContainerId,
        timeout: Duration,
    ) -> Result<(), ReadinessError> {
        let args = strings(&["wait", "--condition=healthy", id.as_str()]);
        match tokio::time::timeout(timeout, self.run(&args, None)).await {
            Err(_) => Err(ReadinessError::Timeout {
                container: id.clone(),
                timeout,
            }),
            Ok(Err(e)) => Err(ReadinessError::Unhealthy {
                container: id.clone(),
                reason: e.to_string(),
            }),
            Ok(Ok(_)) => Ok(()),
        }
    }
}
