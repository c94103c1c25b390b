//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, path_exists};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &["crate::adapter", "crate::infrastructure", "crate::application"],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_never_reaches_into_adapters() {
    let hits = find_lines_containing(
        "src/application",
        &["crate::adapter", "crate::infrastructure", "std::process::Command"],
    );

    assert!(
        hits.is_empty(),
        "found adapter or process imports in application layer: {hits:#?}"
    );
}

#[test]
fn cli_has_no_direct_infrastructure_imports() {
    let hits = find_lines_containing(
        "src/adapter/inbound/cli",
        &["use crate::infrastructure", "crate::infrastructure::"],
    );

    assert!(
        hits.is_empty(),
        "found direct infrastructure imports in inbound CLI adapters: {hits:#?}"
    );
}

#[test]
fn infrastructure_never_reaches_into_the_cli() {
    let hits = find_lines_containing("src/infrastructure", &["crate::adapter::inbound"]);

    assert!(
        hits.is_empty(),
        "found inbound adapter imports in infrastructure: {hits:#?}"
    );
}

#[test]
fn only_the_podman_adapter_spawns_the_engine() {
    let hits = find_lines_containing("src", &["\"podman\""]);
    let allowed = [
        "src/adapter/outbound/podman/client.rs",
        "src/infrastructure/config/settings.rs",
    ];

    let stray: Vec<_> = hits
        .into_iter()
        .filter(|(path, _, _)| !allowed.contains(&path.as_str()))
        .collect();
    assert!(stray.is_empty(), "engine name hard-coded outside its adapter: {stray:#?}");
}

#[test]
fn testkit_is_feature_gated() {
    assert!(path_exists("src/testkit/mod.rs"));
    let lib = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/src/lib.rs")).unwrap();
    assert!(lib.contains("#[cfg(any(test, feature = \"testkit\"))]\npub mod testkit;"));
}
