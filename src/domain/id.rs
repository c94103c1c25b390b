//! String-backed identifiers.
//!
//! Each id is a newtype so a container name can never be passed where a
//! component id is expected. The inner string is private; construct through
//! `new` or `From`.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_id! {
    /// One deployable unit of an application template.
    ComponentId
}

string_id! {
    /// Physical accelerator bus address, e.g. the PCI address `0381:50:00.0`.
    ///
    /// Opaque to the orchestrator: only equality and ordering matter.
    DeviceAddress
}

string_id! {
    /// Pod name as reported by the runtime after a deploy.
    PodId
}

string_id! {
    /// Container name as reported by the runtime after a deploy.
    ContainerId
}

string_id! {
    /// Correlates the log lines and events of one orchestration run.
    RunId
}

impl RunId {
    /// Fresh random run id.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_id_displays_inner_value() {
        let id = ComponentId::from("vllm-server");
        assert_eq!(id.as_str(), "vllm-server");
        assert_eq!(id.to_string(), "vllm-server");
    }

    #[test]
    fn device_addresses_order_lexically() {
        let mut addrs = vec![
            DeviceAddress::from("0381:70:00.0"),
            DeviceAddress::from("0381:50:00.0"),
        ];
        addrs.sort();
        assert_eq!(addrs[0].as_str(), "0381:50:00.0");
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::generate(), RunId::generate());
    }
}
