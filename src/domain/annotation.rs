//! Typed schema for the pod annotations that drive orchestration.
//!
//! Component manifests declare their orchestration needs through pod-level
//! annotations under the `strata.io/` prefix:
//!
//! | Key                                         | Value            |
//! |---------------------------------------------|------------------|
//! | `strata.io/<container>--accelerators`       | device count     |
//! | `strata.io/<container>--expose--<portName>` | container port   |
//! | `strata.io/start`                           | `on` or `off`    |
//!
//! Annotations are parsed exactly once, when the component catalog is built.
//! Every malformed entry is reported, not just the first one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::id::ComponentId;

/// Pod-level annotation carrying the start policy.
pub const START_ANNOTATION: &str = "strata.io/start";

fn accelerator_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^strata\.io/([A-Za-z0-9][-A-Za-z0-9_.]*)--accelerators$")
            .expect("accelerator annotation pattern is valid")
    })
}

fn expose_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^strata\.io/([A-Za-z0-9][-A-Za-z0-9_.]*)--expose--([A-Za-z0-9][-A-Za-z0-9_.]*)$")
            .expect("expose annotation pattern is valid")
    })
}

/// Whether the runtime should start the pod after creating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPolicy {
    On,
    Off,
}

impl StartPolicy {
    /// Parse a start policy. Only the exact values `on` and `off` are accepted;
    /// anything else means "no override".
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for StartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single malformed annotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("component '{component}': annotation '{key}' must be a non-negative integer, got '{value}'")]
    InvalidCount {
        component: ComponentId,
        key: String,
        value: String,
    },

    #[error("component '{component}': annotation '{key}' must be a port number, got '{value}'")]
    InvalidPort {
        component: ComponentId,
        key: String,
        value: String,
    },

    #[error("component '{component}': container name '{container}' is declared more than once")]
    DuplicateContainer {
        component: ComponentId,
        container: String,
    },

    #[error("component '{component}': annotation '{key}' refers to unknown container '{container}'")]
    UnknownContainer {
        component: ComponentId,
        key: String,
        container: String,
    },
}

/// Parsed orchestration annotations for one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentAnnotations {
    accelerators: BTreeMap<String, usize>,
    exposed_ports: BTreeMap<String, BTreeMap<String, u16>>,
    start: Option<StartPolicy>,
}

impl ComponentAnnotations {
    /// Parse raw annotations for `component`, whose pod declares `containers`.
    ///
    /// Returns the parsed annotations alongside every error found. Keys outside
    /// the schema are ignored.
    pub fn parse(
        component: &ComponentId,
        annotations: &BTreeMap<String, String>,
        containers: &BTreeSet<&str>,
    ) -> (Self, Vec<AnnotationError>) {
        let mut parsed = Self::default();
        let mut errors = Vec::new();

        for (key, value) in annotations {
            if key == START_ANNOTATION {
                parsed.start = StartPolicy::parse(value);
                continue;
            }

            if let Some(caps) = accelerator_key().captures(key) {
                let container = caps[1].to_string();
                if !containers.contains(container.as_str()) {
                    errors.push(AnnotationError::UnknownContainer {
                        component: component.clone(),
                        key: key.clone(),
                        container,
                    });
                    continue;
                }
                match value.trim().parse::<usize>() {
                    Ok(count) => {
                        parsed.accelerators.insert(container, count);
                    }
                    Err(_) => errors.push(AnnotationError::InvalidCount {
                        component: component.clone(),
                        key: key.clone(),
                        value: value.clone(),
                    }),
                }
                continue;
            }

            if let Some(caps) = expose_key().captures(key) {
                let container = caps[1].to_string();
                let port_name = caps[2].to_string();
                if !containers.contains(container.as_str()) {
                    errors.push(AnnotationError::UnknownContainer {
                        component: component.clone(),
                        key: key.clone(),
                        container,
                    });
                    continue;
                }
                match value.trim().parse::<u16>() {
                    Ok(port) if port > 0 => {
                        parsed
                            .exposed_ports
                            .entry(container)
                            .or_default()
                            .insert(port_name, port);
                    }
                    _ => errors.push(AnnotationError::InvalidPort {
                        component: component.clone(),
                        key: key.clone(),
                        value: value.clone(),
                    }),
                }
            }
        }

        (parsed, errors)
    }

    /// Declared accelerator count for a container (absent means zero).
    #[must_use]
    pub fn accelerators_for(&self, container: &str) -> usize {
        self.accelerators.get(container).copied().unwrap_or(0)
    }

    /// Exposed ports (port name to container port) for a container.
    #[must_use]
    pub fn ports_for(&self, container: &str) -> BTreeMap<String, u16> {
        self.exposed_ports.get(container).cloned().unwrap_or_default()
    }

    #[must_use]
    pub const fn start(&self) -> Option<StartPolicy> {
        self.start
    }
}
