//! Statically configured device pool.

use async_trait::async_trait;

use crate::domain::DeviceAddress;
use crate::error::DiscoveryError;
use crate::port::DeviceDiscovery;

/// Reports a fixed list of addresses as free.
#[derive(Debug, Clone, Default)]
pub struct FixedDiscovery {
    addresses: Vec<DeviceAddress>,
}

impl FixedDiscovery {
    pub fn new<I, A>(addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<DeviceAddress>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl DeviceDiscovery for FixedDiscovery {
    async fn free_devices(&self) -> Result<Vec<DeviceAddress>, DiscoveryError> {
        Ok(self.addresses.clone())
    }
}
