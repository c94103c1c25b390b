//! Render context and deploy options for one component deployment.

use std::collections::BTreeMap;

use serde::Serialize;

use super::annotation::StartPolicy;

/// Environment variable that receives a container's allocated device addresses.
pub const DEVICE_ENV_VAR: &str = "ACCELERATOR_ADDRESSES";

/// Per-container environment: container name to variable name to value.
pub type ContainerEnv = BTreeMap<String, BTreeMap<String, String>>;

/// Run-wide parameters shared by every component of a deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalParams {
    pub app_name: String,
    pub app_template_name: String,
    pub version: String,
    /// Template values after user overrides were applied.
    pub values: serde_json::Value,
}

/// The complete context a component template is rendered against.
///
/// Owned outright; never shares state with the [`GlobalParams`] it was built
/// from or with another component's params.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderParams {
    #[serde(rename = "AppName")]
    pub app_name: String,
    #[serde(rename = "AppTemplateName")]
    pub app_template_name: String,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Values")]
    pub values: serde_json::Value,
    pub env: ContainerEnv,
}

impl RenderParams {
    /// Serialize into the JSON tree templates are rendered against.
    #[must_use]
    pub fn to_context(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Options passed to the runtime alongside a rendered spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeployOptions {
    pub start: Option<StartPolicy>,
    /// Comma-joined `hostPort:containerPort` or bare `containerPort` entries.
    /// A trailing comma is permitted.
    pub publish: String,
}

impl DeployOptions {
    /// Individual publish entries with empty segments dropped.
    pub fn publish_entries(&self) -> impl Iterator<Item = &str> {
        self.publish.split(',').map(str::trim).filter(|s| !s.is_empty())
    }

    /// Flat key/value form (`start`, `publish`).
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        if let Some(start) = self.start {
            map.insert("start", start.to_string());
        }
        map.insert("publish", self.publish.clone());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_uses_template_field_names() {
        let params = RenderParams {
            app_name: "demo".into(),
            app_template_name: "rag".into(),
            version: "1.0".into(),
            values: serde_json::json!({"ui": {"port": 3000}}),
            env: BTreeMap::new(),
        };
        let ctx = params.to_context();
        assert_eq!(ctx["AppName"], "demo");
        assert_eq!(ctx["Values"]["ui"]["port"], 3000);
        assert!(ctx["env"].is_object());
    }

    #[test]
    fn publish_entries_tolerate_trailing_separator() {
        let opts = DeployOptions {
            start: None,
            publish: "8000:80,9090,".into(),
        };
        assert_eq!(opts.publish_entries().collect::<Vec<_>>(), vec!["8000:80", "9090"]);
        assert!(!opts.as_map().contains_key("start"));
    }
}
