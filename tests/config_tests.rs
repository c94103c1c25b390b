mod support;

use strata::error::{ConfigError, Error};
use strata::infrastructure::config::settings::Config;
use strata::infrastructure::config::DeviceSource;
use tempfile::TempDir;

use support::fixtures::write;

#[test]
fn full_config_file_loads() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "config.toml",
        r#"
[logging]
level = "info"
format = "json"

[templates]
root = "/opt/strata/applications"

[runtime]
binary = "/usr/bin/podman"

[devices]
source = "sysfs"
vendor_id = "0x1014"
device_id = "0x06a7"
driver = ""

[orchestrator]
max_parallel_components = 8

[preflight]
skip = ["numa", "platform"]
numa_affinity_threshold = 50
min_os_version = "9.6"
required_processor = "Power11"

[images]
pull = true
retry_count = 5
retry_interval_secs = 1
"#,
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.runtime.binary, "/usr/bin/podman");
    assert_eq!(config.devices.source, DeviceSource::Sysfs);
    assert_eq!(config.devices.pci_match().driver, None);
    assert_eq!(config.deploy_settings().max_parallel, 8);
    assert_eq!(config.deploy_settings().retry.attempts, 5);
    assert_eq!(
        config.preflight.registry().names(),
        vec!["root", "platform", "power", "rhn", "numa", "accelerator"]
    );
}

#[test]
fn missing_explicit_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn missing_default_file_means_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.runtime.binary, "podman");
    assert!(config.images.pull);
}

#[test]
fn empty_runtime_binary_is_rejected() {
    let err = Config::parse_toml("[runtime]\nbinary = \"  \"\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField {
            field: "runtime.binary"
        })
    ));
}

#[test]
fn unknown_device_source_is_a_parse_error() {
    let err = Config::parse_toml("[devices]\nsource = \"usb\"\n").unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}
