mod support;

use strata::adapter::outbound::template::FilesystemTemplates;
use strata::application::{load_template, required_images, ResourceDemand};
use strata::domain::{ComponentId, LayoutError, RenderParams, DEVICE_ENV_VAR};
use strata::error::{ConfigError, Error};
use strata::port::TemplateRepository;
use tempfile::TempDir;

use support::fixtures::{component_source, layered_template, write};

fn repo() -> (TempDir, FilesystemTemplates) {
    let dir = TempDir::new().unwrap();
    layered_template(dir.path(), "Layered");
    write(
        dir.path(),
        "internal/metadata.yaml",
        "name: internal\nhidden: true\nlayers: []\n",
    );
    let repo = FilesystemTemplates::new(dir.path());
    (dir, repo)
}

#[tokio::test]
async fn hidden_templates_are_listed_on_request() {
    let (_dir, repo) = repo();

    assert_eq!(repo.list_templates(false).await.unwrap(), vec!["Layered"]);
    assert_eq!(
        repo.list_templates(true).await.unwrap(),
        vec!["Layered", "internal"]
    );
}

#[tokio::test]
async fn loaded_template_exposes_layers_demand_and_images() {
    let (_dir, repo) = repo();

    let loaded = load_template(&repo, "layered").await.unwrap();

    assert_eq!(loaded.template.name(), "Layered");
    assert_eq!(loaded.template.layers().len(), 2);
    assert_eq!(loaded.metadata.models, vec!["ibm-granite/granite-3.3-8b"]);
    assert_eq!(
        loaded.template.layers()[1].components(),
        &[ComponentId::from("z")]
    );
    let demand = ResourceDemand::of(&loaded.catalog);
    assert_eq!(demand.total(), 2);
    assert_eq!(demand.for_component(&ComponentId::from("z")), 0);
    assert_eq!(
        required_images(&loaded.catalog).into_iter().collect::<Vec<_>>(),
        vec![
            "registry.local/x:1.2",
            "registry.local/y:1.2",
            "registry.local/z:1.2"
        ]
    );
}

#[tokio::test]
async fn layer_naming_a_missing_component_is_rejected() {
    let (dir, repo) = repo();
    write(
        dir.path(),
        "Layered/metadata.yaml",
        "name: Layered\nlayers:\n  - [x, y]\n  - [z, w]\n",
    );

    let err = load_template(&repo, "Layered").await.unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::Layout(LayoutError::MissingSpecs(ref ids)))
            if ids == &vec![ComponentId::from("w")]
    ));
}

#[tokio::test]
async fn every_malformed_annotation_is_reported() {
    let (dir, repo) = repo();
    write(
        dir.path(),
        "Layered/templates/x.yaml.tmpl",
        &component_source("x", "x-main", 1).replace("\"1\"", "\"one\""),
    );
    write(
        dir.path(),
        "Layered/templates/y.yaml.tmpl",
        &component_source("y", "y-main", 1).replace("\"1\"", "\"-1\""),
    );

    let err = load_template(&repo, "Layered").await.unwrap_err();

    let Error::Config(ConfigError::MalformedAnnotations(errors)) = err else {
        panic!("expected malformed annotations");
    };
    assert_eq!(errors.len(), 2);
}

#[test]
fn rendering_fills_app_values_and_device_env() {
    let (_dir, repo) = repo();
    let specs = tokio_test::block_on(repo.load_component_specs("Layered")).unwrap();
    let x = &specs[&ComponentId::from("x")];

    let params = RenderParams {
        app_name: "demo".into(),
        app_template_name: "Layered".into(),
        version: "1.2".into(),
        values: serde_json::json!({ "model": { "name": "mistral" } }),
        env: [(
            "x-main".to_string(),
            [(DEVICE_ENV_VAR.to_string(), "0000:01:00.0".to_string())].into(),
        )]
        .into(),
    };
    let rendered = tokio_test::block_on(repo.render(x, &params)).unwrap();

    assert!(rendered.yaml.contains("\"demo-x\""));
    assert!(rendered.yaml.contains("mistral"));
    assert!(rendered.yaml.contains("0000:01:00.0"));
}
