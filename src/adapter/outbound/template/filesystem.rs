//! Templates stored on the local filesystem.
//!
//! ```text
//! <root>/
//!   <template>/
//!     metadata.yaml
//!     values.yaml            (optional)
//!     templates/
//!       <component>.yaml.tmpl
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::render::render_template;
use crate::domain::{ComponentId, PodManifest, RenderParams, TemplateMetadata};
use crate::error::TemplateError;
use crate::port::{ConcreteSpec, RenderableSpec, TemplateRepository};

const METADATA_FILE: &str = "metadata.yaml";
const VALUES_FILE: &str = "values.yaml";
const COMPONENT_DIR: &str = "templates";
const COMPONENT_SUFFIX: &str = ".yaml.tmpl";

/// Template repository rooted at a directory.
#[derive(Debug, Clone)]
pub struct FilesystemTemplates {
    root: PathBuf,
}

impl FilesystemTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn template_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

async fn read(path: &Path) -> Result<String, TemplateError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, TemplateError> {
    let text = read(path).await?;
    serde_yaml::from_str(&text).map_err(|source| TemplateError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

async fn list_dir(path: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let io_err = |source: std::io::Error| TemplateError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(path).await.map_err(io_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn manifest(component: &ComponentId, yaml: &str) -> Result<PodManifest, TemplateError> {
    PodManifest::from_yaml(yaml).map_err(|source| TemplateError::Manifest {
        component: component.clone(),
        source,
    })
}

#[async_trait]
impl TemplateRepository for FilesystemTemplates {
    async fn list_templates(&self, include_hidden: bool) -> Result<Vec<String>, TemplateError> {
        let mut names = Vec::new();
        if !self.root.is_dir() {
            debug!(root = %self.root.display(), "Template root does not exist");
            return Ok(names);
        }
        for dir in list_dir(&self.root).await? {
            let metadata_path = dir.join(METADATA_FILE);
            if !metadata_path.is_file() {
                continue;
            }
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let metadata: TemplateMetadata = read_yaml(&metadata_path).await?;
            if metadata.hidden && !include_hidden {
                debug!(template = name, "Skipping hidden template");
                continue;
            }
            names.push(name.to_string());
        }
        Ok(names)
    }

    async fn load_metadata(&self, name: &str) -> Result<TemplateMetadata, TemplateError> {
        let mut metadata: TemplateMetadata =
            read_yaml(&self.template_dir(name).join(METADATA_FILE)).await?;
        if metadata.name.is_empty() {
            metadata.name = name.to_string();
        }
        Ok(metadata)
    }

    async fn load_values(&self, name: &str) -> Result<serde_json::Value, TemplateError> {
        let path = self.template_dir(name).join(VALUES_FILE);
        if !path.is_file() {
            return Ok(serde_json::Value::Object(serde_json::Map::new()));
        }
        let values: Option<serde_json::Value> = read_yaml(&path).await?;
        Ok(values.unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())))
    }

    async fn load_component_specs(
        &self,
        name: &str,
    ) -> Result<BTreeMap<ComponentId, RenderableSpec>, TemplateError> {
        let metadata = self.load_metadata(name).await?;
        let values = self.load_values(name).await?;
        let defaults = RenderParams {
            app_name: name.to_string(),
            app_template_name: metadata.name.clone(),
            version: metadata.version.clone(),
            values,
            env: BTreeMap::new(),
        }
        .to_context();

        let mut specs = BTreeMap::new();
        for path in list_dir(&self.template_dir(name).join(COMPONENT_DIR)).await? {
            let Some(id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(COMPONENT_SUFFIX))
            else {
                continue;
            };
            let id = ComponentId::from(id);
            let source = read(&path).await?;
            let manifest = manifest(&id, &render_template(&id, &source, &defaults)?)?;
            debug!(template = name, component = %id, "Loaded component spec");
            specs.insert(
                id.clone(),
                RenderableSpec {
                    id,
                    source,
                    manifest,
                },
            );
        }
        Ok(specs)
    }

    async fn render(
        &self,
        spec: &RenderableSpec,
        params: &RenderParams,
    ) -> Result<ConcreteSpec, TemplateError> {
        let yaml = render_template(&spec.id, &spec.source, &params.to_context())?;
        manifest(&spec.id, &yaml)?;
        Ok(ConcreteSpec {
            component: spec.id.clone(),
            yaml,
        })
    }
}
