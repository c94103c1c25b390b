//! Host preflight configuration.

use serde::{Deserialize, Serialize};

use crate::adapter::outbound::preflight::{
    AcceleratorRule, NumaRule, PlatformRule, PowerRule, RhnRule, RootRule,
};
use crate::port::RuleRegistry;

/// `[preflight]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Rule names never run.
    pub skip: Vec<String>,
    /// Minimum LPAR affinity score, 0 to 100.
    pub numa_affinity_threshold: u32,
    /// Minimum RHEL release, `major.minor`.
    pub min_os_version: String,
    /// Architecture name as reported by the Rust standard library.
    pub required_arch: String,
    /// Processor generation `/proc/cpuinfo` must name, matched case-insensitively.
    pub required_processor: String,
    /// Text the PCI listing must contain.
    pub accelerator_pattern: String,
}

impl PreflightConfig {
    /// Registry with every built-in rule, in check order.
    #[must_use]
    pub fn registry(&self) -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(RootRule));
        registry.register(Box::new(PlatformRule::new(self.min_os_version.clone())));
        registry.register(Box::new(PowerRule::new(
            self.required_arch.clone(),
            self.required_processor.clone(),
        )));
        registry.register(Box::new(RhnRule::new()));
        registry.register(Box::new(NumaRule::new(self.numa_affinity_threshold)));
        registry.register(Box::new(AcceleratorRule::new(
            self.accelerator_pattern.clone(),
        )));
        registry
    }

    /// Configured skips plus any given on the command line.
    #[must_use]
    pub fn skips_with(&self, extra: &[String]) -> Vec<String> {
        self.skip.iter().chain(extra).cloned().collect()
    }
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            skip: Vec::new(),
            numa_affinity_threshold: 70,
            min_os_version: "9.6".into(),
            required_arch: "powerpc64".into(),
            required_processor: "Power11".into(),
            accelerator_pattern: "IBM Spyre Accelerator".into(),
        }
    }
}
