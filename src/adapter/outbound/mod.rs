//! Outbound adapters (driven side).

pub mod device;
pub mod host;
pub mod notifier;
pub mod podman;
pub mod preflight;
pub mod template;
