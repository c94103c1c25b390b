mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use support::fixtures::{layered_template, write};

fn strata(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("strata").unwrap();
    cmd.env_remove("STRATA_TEMPLATE_ROOT")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn workspace() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("applications");
    layered_template(&templates, "Layered");
    let config = write(
        dir.path(),
        "config.toml",
        &format!(
            "[templates]\nroot = \"{}\"\n\n[runtime]\nbinary = \"strata-missing-engine\"\n",
            templates.display()
        ),
    );
    (dir, config)
}

#[test]
fn config_validate_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    let config = write(
        dir.path(),
        "config.toml",
        "[orchestrator]\nmax_parallel_components = 0\n",
    );

    strata(&config)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_parallel_components"));
}

#[test]
fn config_validate_accepts_good_file() {
    let (_dir, config) = workspace();

    strata(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_show_emits_json() {
    let (_dir, config) = workspace();

    strata(&config)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"config.show\""))
        .stdout(predicate::str::contains("strata-missing-engine"));
}

#[test]
fn templates_lists_the_fixture() {
    let (_dir, config) = workspace();

    strata(&config)
        .args(["--json", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"Layered\""))
        .stdout(predicate::str::contains("\"layers\":2"));
}

#[test]
fn models_list_reports_what_is_stored() {
    let (dir, config) = workspace();
    let models = dir.path().join("models");
    write(&models, "ibm-granite/granite-3.3-8b/config.json", "{}");

    strata(&config)
        .args(["--json", "models", "list", "-t", "layered", "--dir"])
        .arg(&models)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"models.list\""))
        .stdout(predicate::str::contains("\"model\":\"ibm-granite/granite-3.3-8b\""))
        .stdout(predicate::str::contains("\"present\":true"));
}

#[test]
fn create_with_unknown_template_fails() {
    let (_dir, config) = workspace();

    strata(&config)
        .args([
            "create",
            "demo",
            "-t",
            "nope",
            "--skip-validation",
            "root,platform,power,rhn,numa,accelerator",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown application template 'nope'"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();

    strata(&dir.path().join("absent.toml"))
        .arg("templates")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn create_requires_a_template_flag() {
    Command::cargo_bin("strata")
        .unwrap()
        .args(["create", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}
