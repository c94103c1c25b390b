//! PCI device discovery through sysfs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::DeviceAddress;
use crate::error::DiscoveryError;
use crate::port::DeviceDiscovery;

/// Which PCI functions count as free accelerators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciMatch {
    /// Vendor id as written in sysfs, e.g. `0x1014`.
    pub vendor_id: String,
    pub device_id: String,
    /// Driver a free device is bound to. `None` accepts any binding.
    pub driver: Option<String>,
}

/// Scans `<root>/bus/pci/devices` for matching functions.
#[derive(Debug, Clone)]
pub struct SysfsDiscovery {
    root: PathBuf,
    matcher: PciMatch,
}

impl SysfsDiscovery {
    pub fn new(matcher: PciMatch) -> Self {
        Self::with_root("/sys", matcher)
    }

    /// Scan a sysfs tree mounted somewhere other than `/sys`.
    pub fn with_root(root: impl Into<PathBuf>, matcher: PciMatch) -> Self {
        Self {
            root: root.into(),
            matcher,
        }
    }

    fn devices_dir(&self) -> PathBuf {
        self.root.join("bus").join("pci").join("devices")
    }
}

async fn read_id(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .map(|s| s.trim().to_ascii_lowercase())
}

async fn bound_driver(device: &Path) -> Option<String> {
    let target = tokio::fs::read_link(device.join("driver")).await.ok()?;
    target
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

fn normalize(id: &str) -> String {
    let id = id.trim().to_ascii_lowercase();
    if id.starts_with("0x") {
        id
    } else {
        format!("0x{id}")
    }
}

#[async_trait]
impl DeviceDiscovery for SysfsDiscovery {
    async fn free_devices(&self) -> Result<Vec<DeviceAddress>, DiscoveryError> {
        let dir = self.devices_dir();
        let scan_err = |source: std::io::Error| DiscoveryError::Scan {
            path: dir.clone(),
            source,
        };
        let vendor = normalize(&self.matcher.vendor_id);
        let device = normalize(&self.matcher.device_id);

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(scan_err)?;
        let mut found = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(scan_err)? {
            let path = entry.path();
            if read_id(&path.join("vendor")).await.as_deref() != Some(vendor.as_str())
                || read_id(&path.join("device")).await.as_deref() != Some(device.as_str())
            {
                continue;
            }
            if let Some(expected) = &self.matcher.driver {
                let driver = bound_driver(&path).await;
                if driver.as_deref() != Some(expected.as_str()) {
                    debug!(device = %path.display(), driver = ?driver, "Device not bound to expected driver");
                    continue;
                }
            }
            if let Some(address) = path.file_name().and_then(|n| n.to_str()) {
                found.push(DeviceAddress::new(address));
            }
        }

        found.sort();
        debug!(free = found.len(), "Scanned PCI devices");
        Ok(found)
    }
}
