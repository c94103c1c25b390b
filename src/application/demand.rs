//! Resource demand calculation.
//!
//! Sums the accelerator devices every container of every component declares,
//! before anything is deployed.

use std::collections::BTreeMap;

use crate::domain::{ComponentCatalog, ComponentId};
use crate::error::ConfigError;
use crate::port::RenderableSpec;

/// Accelerator demand of a whole template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDemand {
    total: usize,
    per_component: BTreeMap<ComponentId, usize>,
}

impl ResourceDemand {
    /// Compute the demand of every component in the catalog. Pure.
    #[must_use]
    pub fn of(catalog: &ComponentCatalog) -> Self {
        let per_component: BTreeMap<_, _> = catalog
            .iter()
            .map(|spec| (spec.id().clone(), spec.total_accelerators()))
            .collect();
        let total = per_component.values().sum();
        Self {
            total,
            per_component,
        }
    }

    /// Devices required across the whole template.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Devices required by one component (zero if unknown).
    #[must_use]
    pub fn for_component(&self, id: &ComponentId) -> usize {
        self.per_component.get(id).copied().unwrap_or(0)
    }
}

/// Parse and validate every component's annotations into a catalog.
///
/// Runs over every component before returning, so the error carries every
/// malformed annotation in the template, not just the first one found.
pub fn build_catalog<'a, I>(specs: I) -> Result<ComponentCatalog, ConfigError>
where
    I: IntoIterator<Item = &'a RenderableSpec>,
{
    ComponentCatalog::build(
        specs
            .into_iter()
            .map(|spec| (spec.id.clone(), spec.manifest.clone())),
    )
    .map_err(ConfigError::MalformedAnnotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComponentSpec, ContainerSpec, PodManifest};

    fn container(name: &str, accelerators: usize) -> ContainerSpec {
        ContainerSpec {
            name: name.into(),
            image: format!("{name}:latest"),
            accelerators,
            exposed_ports: BTreeMap::new(),
            health_check_configured: false,
        }
    }

    fn renderable(id: &str, yaml: &str) -> RenderableSpec {
        RenderableSpec {
            id: ComponentId::from(id),
            source: yaml.to_string(),
            manifest: PodManifest::from_yaml(yaml).unwrap(),
        }
    }

    #[test]
    fn sums_across_containers_and_components() {
        let catalog = ComponentCatalog::from_specs(vec![
            ComponentSpec::new("x", vec![container("a", 1), container("b", 2)], None),
            ComponentSpec::new("y", vec![container("c", 1)], None),
            ComponentSpec::new("z", vec![container("d", 0)], None),
        ]);

        let demand = ResourceDemand::of(&catalog);

        assert_eq!(demand.total(), 4);
        assert_eq!(demand.for_component(&ComponentId::from("x")), 3);
        assert_eq!(demand.for_component(&ComponentId::from("z")), 0);
    }

    #[test]
    fn empty_catalog_needs_nothing() {
        assert_eq!(ResourceDemand::of(&ComponentCatalog::default()).total(), 0);
    }

    #[test]
    fn build_catalog_reports_every_malformed_component() {
        let bad_a = "metadata:\n  annotations:\n    strata.io/c--accelerators: one\nspec:\n  containers:\n    - name: c\n";
        let bad_b = "metadata:\n  annotations:\n    strata.io/d--accelerators: two\nspec:\n  containers:\n    - name: d\n";
        let good = "metadata:\n  annotations:\n    strata.io/e--accelerators: \"1\"\nspec:\n  containers:\n    - name: e\n";
        let specs = [renderable("a", bad_a), renderable("g", good), renderable("b", bad_b)];

        let err = build_catalog(specs.iter()).unwrap_err();

        match err {
            ConfigError::MalformedAnnotations(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected malformed annotations, got {other}"),
        }
    }
}
