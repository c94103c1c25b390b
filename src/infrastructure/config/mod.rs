//! Infrastructure configuration modules.

pub mod devices;
pub mod logging;
pub mod preflight;
pub mod settings;

pub use devices::{DeviceSource, DevicesConfig};
pub use logging::LoggingConfig;
pub use preflight::PreflightConfig;
pub use settings::{Config, ModelsConfig};
