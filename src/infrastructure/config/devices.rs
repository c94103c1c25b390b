//! Accelerator device pool configuration.

use serde::{Deserialize, Serialize};

use crate::adapter::outbound::device::PciMatch;

/// Where the free device pool comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSource {
    /// Scan PCI devices in sysfs.
    #[default]
    Sysfs,
    /// Use `addresses` verbatim.
    Fixed,
}

/// `[devices]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DevicesConfig {
    pub source: DeviceSource,
    pub vendor_id: String,
    pub device_id: String,
    /// Driver free devices are bound to; empty accepts any.
    pub driver: String,
    /// Addresses for the fixed source.
    pub addresses: Vec<String>,
}

impl DevicesConfig {
    /// PCI matcher for the sysfs source.
    #[must_use]
    pub fn pci_match(&self) -> PciMatch {
        PciMatch {
            vendor_id: self.vendor_id.clone(),
            device_id: self.device_id.clone(),
            driver: (!self.driver.is_empty()).then(|| self.driver.clone()),
        }
    }
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            source: DeviceSource::Sysfs,
            vendor_id: "0x1014".into(),
            device_id: "0x06a7".into(),
            driver: "vfio-pci".into(),
            addresses: Vec::new(),
        }
    }
}
