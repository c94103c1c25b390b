//! Inbound operator accessor for CLI handlers.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{ConfigError, Result};
use crate::port::inbound::operator::port::OperatorPort;

static OPERATOR: OnceLock<Box<dyn OperatorPort>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(operator: Box<dyn OperatorPort>) -> std::result::Result<(), Box<dyn OperatorPort>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn OperatorPort {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}

/// Load config TOML from disk for operator-facing use-cases.
pub fn read_config_toml(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?)
}

/// Like [`read_config_toml`], but a missing file reads as empty, which
/// means defaults.
pub fn read_config_toml_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ConfigError::ReadFile(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_file_is_empty_only_when_allowed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        assert_eq!(read_config_toml_or_empty(&path).unwrap(), "");
        assert!(matches!(
            read_config_toml(&path),
            Err(Error::Config(ConfigError::ReadFile(_)))
        ));
    }
}
