//! Template repository assembled in code.

use std::collections::BTreeMap;
use std::io;

use async_trait::async_trait;

use crate::adapter::outbound::template::render_template;
use crate::domain::{ComponentId, PodManifest, RenderParams, TemplateMetadata};
use crate::error::TemplateError;
use crate::port::{ConcreteSpec, RenderableSpec, TemplateRepository};

/// A single template held in memory.
///
/// Without explicit layers every component lands in one layer.
#[derive(Debug, Clone)]
pub struct InMemoryTemplates {
    name: String,
    version: String,
    hidden: bool,
    smt_level: Option<u32>,
    models: Vec<String>,
    values: serde_json::Value,
    components: BTreeMap<String, String>,
    layers: Option<Vec<Vec<String>>>,
}

impl InMemoryTemplates {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "1.0.0".into(),
            hidden: false,
            smt_level: None,
            models: Vec::new(),
            values: serde_json::json!({}),
            components: BTreeMap::new(),
            layers: None,
        }
    }

    #[must_use]
    pub fn with_component(mut self, id: &str, source: &str) -> Self {
        self.components.insert(id.to_string(), source.to_string());
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: &[&[&str]]) -> Self {
        self.layers = Some(
            layers
                .iter()
                .map(|l| l.iter().map(ToString::to_string).collect())
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: serde_json::Value) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub const fn with_smt_level(mut self, level: u32) -> Self {
        self.smt_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: &str) -> Self {
        self.models.push(model.to_string());
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    fn metadata(&self) -> TemplateMetadata {
        let layers = self.layers.clone().unwrap_or_else(|| {
            vec![self.components.keys().cloned().collect()]
        });
        TemplateMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            description: None,
            hidden: self.hidden,
            smt_level: self.smt_level,
            models: self.models.clone(),
            layers: layers
                .into_iter()
                .map(|l| l.into_iter().map(ComponentId::from).collect())
                .collect(),
        }
    }

    fn check(&self, name: &str) -> Result<(), TemplateError> {
        if name == self.name {
            Ok(())
        } else {
            Err(TemplateError::Read {
                path: name.into(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such template"),
            })
        }
    }

    /// Component specs rendered against the default values, without going
    /// through the async trait.
    ///
    /// # Panics
    ///
    /// Panics if a component is not a valid pod manifest.
    pub fn specs_for(&self, app_name: &str) -> BTreeMap<ComponentId, RenderableSpec> {
        self.try_specs(app_name)
            .expect("test component is a valid pod manifest")
    }

    fn try_specs(
        &self,
        app_name: &str,
    ) -> Result<BTreeMap<ComponentId, RenderableSpec>, TemplateError> {
        let defaults = RenderParams {
            app_name: app_name.to_string(),
            app_template_name: self.name.clone(),
            version: self.version.clone(),
            values: self.values.clone(),
            env: BTreeMap::new(),
        }
        .to_context();

        self.components
            .iter()
            .map(|(id, source)| {
                let id = ComponentId::from(id.as_str());
                let yaml = render_template(&id, source, &defaults)?;
                let manifest =
                    PodManifest::from_yaml(&yaml).map_err(|e| TemplateError::Manifest {
                        component: id.clone(),
                        source: e,
                    })?;
                Ok((
                    id.clone(),
                    RenderableSpec {
                        id,
                        source: source.clone(),
                        manifest,
                    },
                ))
            })
            .collect()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplates {
    async fn list_templates(&self, include_hidden: bool) -> Result<Vec<String>, TemplateError> {
        if self.hidden && !include_hidden {
            return Ok(Vec::new());
        }
        Ok(vec![self.name.clone()])
    }

    async fn load_metadata(&self, name: &str) -> Result<TemplateMetadata, TemplateError> {
        self.check(name)?;
        Ok(self.metadata())
    }

    async fn load_values(&self, name: &str) -> Result<serde_json::Value, TemplateError> {
        self.check(name)?;
        Ok(self.values.clone())
    }

    async fn load_component_specs(
        &self,
        name: &str,
    ) -> Result<BTreeMap<ComponentId, RenderableSpec>, TemplateError> {
        self.check(name)?;
        self.try_specs(name)
    }

    async fn render(
        &self,
        spec: &RenderableSpec,
        params: &RenderParams,
    ) -> Result<ConcreteSpec, TemplateError> {
        let yaml = render_template(&spec.id, &spec.source, &params.to_context())?;
        PodManifest::from_yaml(&yaml).map_err(|source| TemplateError::Manifest {
            component: spec.id.clone(),
            source,
        })?;
        Ok(ConcreteSpec {
            component: spec.id.clone(),
            yaml,
        })
    }
}
