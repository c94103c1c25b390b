use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::annotation::AnnotationError;
use crate::domain::id::{ComponentId, ContainerId};
use crate::domain::template::LayoutError;

/// Configuration-related errors with structured variants.
///
/// Every variant is raised before any deployment is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("unknown application template '{name}'")]
    UnknownTemplate { name: String },

    #[error("template layout is inconsistent: {0}")]
    Layout(#[from] LayoutError),

    #[error("{} malformed annotation(s): {}", .0.len(), join_annotation_errors(.0))]
    MalformedAnnotations(Vec<AnnotationError>),

    #[error("invalid parameter '{key}': {reason}")]
    InvalidParam { key: String, reason: String },
}

fn join_annotation_errors(errors: &[AnnotationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while loading or rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("rendered spec for '{component}' is not a valid pod manifest: {source}")]
    Manifest {
        component: ComponentId,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("template for '{component}' uses unsupported action `{{{{{action}}}}}`; only `{{{{ .Path }}}}` placeholders are supported")]
    UnsupportedAction {
        component: ComponentId,
        action: String,
    },

    #[error("no template source for component '{0}'")]
    UnknownComponent(ComponentId),
}

/// Errors reported by the container runtime client.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {}: {stderr}", .status.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("unexpected runtime output: {0}")]
    Parse(String),

    #[error("runtime rejected the request: {0}")]
    Rejected(String),
}

/// A deployed container never became healthy.
#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("container {container} not healthy within {}s", .timeout.as_secs())]
    Timeout {
        container: ContainerId,
        timeout: Duration,
    },

    #[error("container {container} reported unhealthy: {reason}")]
    Unhealthy {
        container: ContainerId,
        reason: String,
    },
}

/// Failure of a single component task within a layer.
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("no specification loaded for component")]
    MissingSpec,

    #[error("device pool exhausted: {requested} requested, {remaining} remaining")]
    DevicesExhausted { requested: usize, remaining: usize },

    #[error("render failed: {0}")]
    Render(#[source] TemplateError),

    #[error("deploy failed: {0}")]
    Deploy(#[source] RuntimeError),

    #[error("failed to inspect container {container}: {source}")]
    Inspect {
        container: ContainerId,
        #[source]
        source: RuntimeError,
    },

    #[error("readiness check failed: {0}")]
    Readiness(#[from] ReadinessError),

    #[error("task aborted: {0}")]
    Aborted(String),
}

/// A component paired with the reason it failed.
#[derive(Debug)]
pub struct ComponentFailure {
    pub component: ComponentId,
    pub error: ComponentError,
}

/// Composite error for one layer: every component that failed in it.
#[derive(Error, Debug)]
#[error("layer {layer} failed: {}", summarize(.failures))]
pub struct LayerError {
    /// One-based layer number.
    pub layer: usize,
    pub failures: Vec<ComponentFailure>,
}

impl LayerError {
    /// IDs of the failed components, in report order.
    pub fn failed_components(&self) -> impl Iterator<Item = &ComponentId> {
        self.failures.iter().map(|f| &f.component)
    }
}

fn summarize(failures: &[ComponentFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.component, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while enumerating free accelerator devices.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while preparing model weights.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to prepare model directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download model '{model}': {source}")]
    Download {
        model: String,
        #[source]
        source: RuntimeError,
    },
}

/// Host preflight rules with error level failed.
#[derive(Error, Debug)]
#[error("host preflight failed: {}", .failed.join(", "))]
pub struct PreflightError {
    pub failed: Vec<String>,
}

/// Errors raised while tuning the host.
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to run `{command}`: {reason}")]
    Command { command: String, reason: String },

    #[error("unexpected output from `{command}`: {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("SMT level verification failed: expected {expected}, got {actual}")]
    VerificationFailed { expected: u32, actual: u32 },

    #[error("host tuning did not complete: {0}")]
    Interrupted(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("insufficient accelerator devices: {required} required, {available} available")]
    InsufficientResources { required: usize, available: usize },

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error(transparent)]
    Tuning(#[from] TuningError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
