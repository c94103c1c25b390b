//! Operating system check.

use std::path::PathBuf;

use crate::port::{Rule, RuleLevel, RuleViolation};

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Passes on Red Hat Enterprise Linux at or above a minimum version.
#[derive(Debug, Clone)]
pub struct PlatformRule {
    min_version: String,
    os_release: PathBuf,
}

impl PlatformRule {
    pub fn new(min_version: impl Into<String>) -> Self {
        Self::with_path(OS_RELEASE_PATH, min_version)
    }

    pub fn with_path(os_release: impl Into<PathBuf>, min_version: impl Into<String>) -> Self {
        Self {
            min_version: min_version.into(),
            os_release: os_release.into(),
        }
    }
}

/// Whether os-release contents describe RHEL.
#[must_use]
pub fn is_rhel(os_release: &str) -> bool {
    os_release.contains("Red Hat Enterprise Linux")
        || os_release
            .lines()
            .filter_map(|line| line.split_once('='))
            .any(|(key, value)| key.trim() == "ID" && value.trim().trim_matches('"') == "rhel")
}

/// `VERSION_ID` from os-release contents, unquoted.
#[must_use]
pub fn version_id(os_release: &str) -> Option<&str> {
    os_release
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "VERSION_ID")
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// `major.minor` as a comparable pair; a missing minor is zero.
#[must_use]
pub fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

impl Rule for PlatformRule {
    fn name(&self) -> &'static str {
        "platform"
    }

    fn verify(&self) -> Result<(), RuleViolation> {
        let minimum = parse_version(&self.min_version).ok_or_else(|| {
            RuleViolation::new(format!(
                "invalid minimum RHEL version '{}'",
                self.min_version
            ))
        })?;
        let text = std::fs::read_to_string(&self.os_release).map_err(|e| {
            RuleViolation::new(format!("failed to read {}: {e}", self.os_release.display()))
        })?;

        if !is_rhel(&text) {
            return Err(RuleViolation::new(
                "unsupported operating system: only RHEL is supported",
            ));
        }
        let version = version_id(&text)
            .ok_or_else(|| RuleViolation::new("unable to determine OS version"))?;
        let actual = parse_version(version)
            .ok_or_else(|| RuleViolation::new("unable to determine OS version"))?;
        if actual < minimum {
            return Err(RuleViolation::new(format!(
                "unsupported RHEL version: {version}. Minimum required version is {}",
                self.min_version
            )));
        }
        Ok(())
    }

    fn message(&self) -> String {
        format!("Operating system is RHEL {} or later", self.min_version)
    }

    fn level(&self) -> RuleLevel {
        RuleLevel::Error
    }
}
