//! Template repository port.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{ComponentId, PodManifest, RenderParams, TemplateMetadata};
use crate::error::TemplateError;

/// A parameterizable component specification.
#[derive(Debug, Clone)]
pub struct RenderableSpec {
    pub id: ComponentId,
    /// Unrendered template text.
    pub source: String,
    /// The manifest rendered against default values, used to read
    /// annotations, containers, and images before the real render.
    pub manifest: PodManifest,
}

/// A fully rendered component specification, ready for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteSpec {
    pub component: ComponentId,
    pub yaml: String,
}

/// Source of application templates.
///
/// Template names passed to the `load_*` methods are exact names as returned
/// by [`TemplateRepository::list_templates`].
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// List template names. Hidden templates are included only on request.
    async fn list_templates(&self, include_hidden: bool) -> Result<Vec<String>, TemplateError>;

    /// Load the metadata (layers, version, tuning target) of a template.
    async fn load_metadata(&self, name: &str) -> Result<TemplateMetadata, TemplateError>;

    /// Load the default values schema of a template.
    async fn load_values(&self, name: &str) -> Result<serde_json::Value, TemplateError>;

    /// Load every component specification shipped with a template.
    async fn load_component_specs(
        &self,
        name: &str,
    ) -> Result<BTreeMap<ComponentId, RenderableSpec>, TemplateError>;

    /// Render one component against its parameters.
    async fn render(
        &self,
        spec: &RenderableSpec,
        params: &RenderParams,
    ) -> Result<ConcreteSpec, TemplateError>;
}
