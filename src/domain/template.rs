//! Application templates and their layer layout.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ComponentId;

/// Template metadata as declared by the template author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hidden templates are only listed on explicit request.
    #[serde(default)]
    pub hidden: bool,
    /// Target SMT level the host should be tuned to before deploying.
    #[serde(default)]
    pub smt_level: Option<u32>,
    /// Components grouped into layers, deployed in order.
    #[serde(default)]
    pub layers: Vec<Vec<ComponentId>>,
    /// Model weights the components serve, fetched before the first layer.
    #[serde(default)]
    pub models: Vec<String>,
}

/// Mismatch between the declared layers and the shipped components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("component '{0}' appears in more than one layer position")]
    DuplicateComponent(ComponentId),

    #[error("layers reference components with no specification: {}", join(.0))]
    MissingSpecs(Vec<ComponentId>),

    #[error("components are not assigned to any layer: {}", join(.0))]
    Unlayered(Vec<ComponentId>),
}

fn join(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(ComponentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One layer: components with no dependency on each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    index: usize,
    components: Vec<ComponentId>,
}

impl Layer {
    pub fn new(index: usize, components: Vec<ComponentId>) -> Self {
        Self { index, components }
    }

    /// Zero-based position of this layer.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// One-based position, as shown to users.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.index + 1
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }
}

/// A validated application template, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationTemplate {
    name: String,
    version: String,
    host_tuning_target: Option<u32>,
    layers: Vec<Layer>,
}

impl ApplicationTemplate {
    /// Validate `metadata` against the set of shipped components.
    ///
    /// The union of all layers must equal `shipped` exactly, and no component
    /// may appear twice.
    pub fn from_metadata(
        metadata: &TemplateMetadata,
        shipped: &BTreeSet<ComponentId>,
    ) -> Result<Self, LayoutError> {
        let mut seen = BTreeSet::new();
        for id in metadata.layers.iter().flatten() {
            if !seen.insert(id.clone()) {
                return Err(LayoutError::DuplicateComponent(id.clone()));
            }
        }

        let missing: Vec<_> = seen.difference(shipped).cloned().collect();
        if !missing.is_empty() {
            return Err(LayoutError::MissingSpecs(missing));
        }

        let unlayered: Vec<_> = shipped.difference(&seen).cloned().collect();
        if !unlayered.is_empty() {
            return Err(LayoutError::Unlayered(unlayered));
        }

        let layers = metadata
            .layers
            .iter()
            .enumerate()
            .map(|(index, ids)| Layer::new(index, ids.clone()))
            .collect();

        Ok(Self {
            name: metadata.name.clone(),
            version: metadata.version.clone(),
            host_tuning_target: metadata.smt_level,
            layers,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn host_tuning_target(&self) -> Option<u32> {
        self.host_tuning_target
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ComponentId> {
        names.iter().map(|n| ComponentId::from(*n)).collect()
    }

    fn metadata(layers: &[&[&str]]) -> TemplateMetadata {
        TemplateMetadata {
            name: "rag".into(),
            version: "1.0".into(),
            layers: layers.iter().map(|l| ids(l)).collect(),
            ..Default::default()
        }
    }

    fn shipped(names: &[&str]) -> BTreeSet<ComponentId> {
        ids(names).into_iter().collect()
    }

    #[test]
    fn accepts_exact_cover() {
        let template =
            ApplicationTemplate::from_metadata(&metadata(&[&["x", "y"], &["z"]]), &shipped(&["x", "y", "z"]))
                .unwrap();

        assert_eq!(template.layers().len(), 2);
        assert_eq!(template.layers()[1].number(), 2);
        assert_eq!(template.layers()[0].components(), ids(&["x", "y"]).as_slice());
    }

    #[test]
    fn rejects_duplicates() {
        let err = ApplicationTemplate::from_metadata(&metadata(&[&["x"], &["x"]]), &shipped(&["x"]))
            .unwrap_err();
        assert_eq!(err, LayoutError::DuplicateComponent(ComponentId::from("x")));
    }

    #[test]
    fn rejects_layers_without_specs() {
        let err = ApplicationTemplate::from_metadata(&metadata(&[&["x", "ghost"]]), &shipped(&["x"]))
            .unwrap_err();
        assert_eq!(err, LayoutError::MissingSpecs(ids(&["ghost"])));
    }

    #[test]
    fn rejects_orphaned_specs() {
        let err = ApplicationTemplate::from_metadata(&metadata(&[&["x"]]), &shipped(&["x", "orphan"]))
            .unwrap_err();
        assert_eq!(err, LayoutError::Unlayered(ids(&["orphan"])));
    }

    #[test]
    fn metadata_parses_from_yaml() {
        let yaml = "name: rag\nversion: \"0.3\"\nsmtLevel: 2\nmodels:\n  - ibm-granite/granite-3.3-8b-instruct\nlayers:\n  - [vllm, embed]\n  - [ui]\n";
        let meta: TemplateMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(meta.smt_level, Some(2));
        assert_eq!(meta.models, vec!["ibm-granite/granite-3.3-8b-instruct"]);
        assert_eq!(meta.layers[0], ids(&["vllm", "embed"]));
        assert!(!meta.hidden);
    }
}
