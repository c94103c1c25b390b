//! Accelerator device discovery adapters.

pub mod fixed;
pub mod sysfs;

pub use fixed::FixedDiscovery;
pub use sysfs::{PciMatch, SysfsDiscovery};
