//! Runtime-agnostic domain types.
//!
//! Nothing in here talks to the outside world: templates, components,
//! annotations, render parameters, and run state are plain values.

pub mod annotation;
pub mod component;
pub mod id;
pub mod manifest;
pub mod params;
pub mod run;
pub mod template;

pub use annotation::{AnnotationError, ComponentAnnotations, StartPolicy};
pub use component::{ComponentCatalog, ComponentSpec, ContainerSpec};
pub use id::{ComponentId, ContainerId, DeviceAddress, PodId, RunId};
pub use manifest::PodManifest;
pub use params::{ContainerEnv, DeployOptions, GlobalParams, RenderParams, DEVICE_ENV_VAR};
pub use run::{LayerResult, RunState};
pub use template::{ApplicationTemplate, Layer, LayoutError, TemplateMetadata};
