//! Path utilities for strata.
//!
//! All user data lives under `~/.strata/`:
//! - `~/.strata/config.toml` - main configuration
//! - `~/.strata/applications/` - application templates

use std::path::PathBuf;

/// Returns the strata home directory (`~/.strata/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".strata")
}

/// Returns the default config file path (`~/.strata/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default template root (`~/.strata/applications/`).
pub fn default_template_root() -> PathBuf {
    home_dir().join("applications")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_strata_home() {
        let home = home_dir();

        assert!(home.to_string_lossy().contains(".strata"));
        assert!(default_config().starts_with(&home));
        assert!(default_template_root().starts_with(&home));
    }
}
