//! Minimal view of a Kubernetes-style pod manifest.
//!
//! Only the fields the orchestrator reads are modelled; everything else in
//! the document is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// A pod manifest as produced by rendering a component template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodManifest {
    #[serde(default)]
    pub metadata: PodMetadata,
    #[serde(default)]
    pub spec: PodBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodMetadata {
    #[serde(default)]
    pub name: Option<String>,
    /// Annotation values are stringified; unquoted YAML scalars are accepted.
    #[serde(default, deserialize_with = "scalar_map")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodBody {
    #[serde(default)]
    pub containers: Vec<ContainerManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerManifest {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub liveness_probe: Option<serde_yaml::Value>,
    #[serde(default)]
    pub startup_probe: Option<serde_yaml::Value>,
}

impl ContainerManifest {
    /// Whether the container declares a liveness or startup check the runtime turns into a health check.
    #[must_use]
    pub fn has_health_check(&self) -> bool {
        self.liveness_probe.is_some() || self.startup_probe.is_some()
    }
}

impl PodManifest {
    /// Parse a manifest from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_yaml::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Null => String::new(),
                other => serde_yaml::to_string(&other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            };
            (key, value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_annotations_and_containers() {
        let yaml = r#"
apiVersion: v1
kind: Pod
metadata:
  name: demo
  annotations:
    strata.io/server--accelerators: 2
    strata.io/start: "on"
spec:
  containers:
    - name: server
      image: quay.io/demo/server:1.0
      livenessProbe:
        httpGet:
          path: /health
          port: 8000
    - name: sidecar
      image: quay.io/demo/sidecar:1.0
"#;
        let pod = PodManifest::from_yaml(yaml).unwrap();

        assert_eq!(pod.metadata.name.as_deref(), Some("demo"));
        assert_eq!(
            pod.metadata.annotations.get("strata.io/server--accelerators"),
            Some(&"2".to_string())
        );
        assert_eq!(pod.spec.containers.len(), 2);
        assert!(pod.spec.containers[0].has_health_check());
        assert!(!pod.spec.containers[1].has_health_check());
    }

    #[test]
    fn missing_annotations_default_to_empty() {
        let pod = PodManifest::from_yaml("metadata:\n  name: x\nspec:\n  containers: []\n").unwrap();
        assert!(pod.metadata.annotations.is_empty());
    }
}
