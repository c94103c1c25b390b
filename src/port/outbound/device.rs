//! Device discovery port.

use async_trait::async_trait;

use crate::domain::DeviceAddress;
use crate::error::DiscoveryError;

/// Enumerates accelerator devices currently free on the host.
///
/// Queried once per run, and only when the template needs devices.
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    /// Currently unallocated device addresses, in allocation order.
    async fn free_devices(&self) -> Result<Vec<DeviceAddress>, DiscoveryError>;
}
