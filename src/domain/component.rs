//! Component and container specifications.
//!
//! A [`ComponentSpec`] is the typed, validated form of one component
//! manifest. The [`ComponentCatalog`] holds every component shipped with a
//! template and is read-only for the duration of a run.

use std::collections::{BTreeMap, BTreeSet};

use super::annotation::{AnnotationError, ComponentAnnotations, StartPolicy};
use super::id::ComponentId;
use super::manifest::PodManifest;

/// One container inside a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub accelerators: usize,
    /// Port name to container port.
    pub exposed_ports: BTreeMap<String, u16>,
    pub health_check_configured: bool,
}

/// A deployable component: one pod with one or more containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    id: ComponentId,
    containers: Vec<ContainerSpec>,
    start: Option<StartPolicy>,
}

impl ComponentSpec {
    /// Build a component directly from typed parts.
    pub fn new(
        id: impl Into<ComponentId>,
        containers: Vec<ContainerSpec>,
        start: Option<StartPolicy>,
    ) -> Self {
        Self {
            id: id.into(),
            containers,
            start,
        }
    }

    /// Build a component from its manifest, validating the annotations.
    ///
    /// Container names must be unique within the pod: devices and ports are
    /// keyed by container name.
    pub fn from_manifest(
        id: ComponentId,
        manifest: &PodManifest,
    ) -> Result<Self, Vec<AnnotationError>> {
        let mut names = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for container in &manifest.spec.containers {
            if !names.insert(container.name.as_str()) {
                duplicates.insert(container.name.as_str());
            }
        }
        let (annotations, mut errors) =
            ComponentAnnotations::parse(&id, &manifest.metadata.annotations, &names);
        errors.extend(duplicates.into_iter().map(|container| {
            AnnotationError::DuplicateContainer {
                component: id.clone(),
                container: container.to_string(),
            }
        }));
        if !errors.is_empty() {
            return Err(errors);
        }

        let containers = manifest
            .spec
            .containers
            .iter()
            .map(|c| ContainerSpec {
                name: c.name.clone(),
                image: c.image.clone(),
                accelerators: annotations.accelerators_for(&c.name),
                exposed_ports: annotations.ports_for(&c.name),
                health_check_configured: c.has_health_check(),
            })
            .collect();

        Ok(Self {
            id,
            containers,
            start: annotations.start(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    #[must_use]
    pub fn containers(&self) -> &[ContainerSpec] {
        &self.containers
    }

    #[must_use]
    pub const fn start(&self) -> Option<StartPolicy> {
        self.start
    }

    /// Per-container accelerator demand, in declaration order, including zeros.
    #[must_use]
    pub fn accelerator_demand(&self) -> Vec<(String, usize)> {
        self.containers
            .iter()
            .map(|c| (c.name.clone(), c.accelerators))
            .collect()
    }

    /// Sum of accelerators declared by every container.
    #[must_use]
    pub fn total_accelerators(&self) -> usize {
        self.containers.iter().map(|c| c.accelerators).sum()
    }
}

/// All components shipped with one application template.
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    components: BTreeMap<ComponentId, ComponentSpec>,
}

impl ComponentCatalog {
    /// Build the catalog from rendered manifests.
    ///
    /// Every manifest is validated before returning, so the error list covers
    /// every malformed annotation across the whole template.
    pub fn build<I>(manifests: I) -> Result<Self, Vec<AnnotationError>>
    where
        I: IntoIterator<Item = (ComponentId, PodManifest)>,
    {
        let mut components = BTreeMap::new();
        let mut errors = Vec::new();

        for (id, manifest) in manifests {
            match ComponentSpec::from_manifest(id.clone(), &manifest) {
                Ok(spec) => {
                    components.insert(id, spec);
                }
                Err(mut errs) => errors.append(&mut errs),
            }
        }

        if errors.is_empty() {
            Ok(Self { components })
        } else {
            Err(errors)
        }
    }

    /// Build a catalog from already-typed components.
    pub fn from_specs(specs: impl IntoIterator<Item = ComponentSpec>) -> Self {
        Self {
            components: specs.into_iter().map(|s| (s.id().clone(), s)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &ComponentId) -> Option<&ComponentSpec> {
        self.components.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentSpec> {
        self.components.values()
    }

    #[must_use]
    pub fn ids(&self) -> BTreeSet<ComponentId> {
        self.components.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
metadata:
  annotations:
    strata.io/server--accelerators: "2"
    strata.io/server--expose--api: "8000"
spec:
  containers:
    - name: server
      image: server:1
      startupProbe:
        exec:
          command: ["true"]
    - name: proxy
      image: proxy:1
"#;

    #[test]
    fn from_manifest_types_every_container() {
        let manifest = PodManifest::from_yaml(MANIFEST).unwrap();
        let spec = ComponentSpec::from_manifest(ComponentId::from("vllm"), &manifest).unwrap();

        assert_eq!(spec.containers().len(), 2);
        assert_eq!(spec.total_accelerators(), 2);
        assert_eq!(
            spec.accelerator_demand(),
            vec![("server".to_string(), 2), ("proxy".to_string(), 0)]
        );
        assert!(spec.containers()[0].health_check_configured);
        assert_eq!(spec.containers()[0].exposed_ports.get("api"), Some(&8000));
    }

    #[test]
    fn duplicate_container_names_are_malformed() {
        let manifest = PodManifest::from_yaml(
            r#"
metadata:
  annotations:
    strata.io/worker--accelerators: "1"
spec:
  containers:
    - name: worker
      image: worker:1
    - name: worker
      image: worker:1
"#,
        )
        .unwrap();

        let errors = ComponentSpec::from_manifest(ComponentId::from("pool"), &manifest).unwrap_err();

        assert_eq!(
            errors,
            vec![AnnotationError::DuplicateContainer {
                component: ComponentId::from("pool"),
                container: "worker".into(),
            }]
        );
    }

    #[test]
    fn catalog_reports_errors_from_every_component() {
        let bad = |count: &str| {
            PodManifest::from_yaml(&format!(
                "metadata:\n  annotations:\n    strata.io/c--accelerators: \"{count}\"\nspec:\n  containers:\n    - name: c\n"
            ))
            .unwrap()
        };

        let result = ComponentCatalog::build(vec![
            (ComponentId::from("a"), bad("x")),
            (ComponentId::from("b"), bad("y")),
        ]);

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
