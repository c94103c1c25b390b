//! Operator-facing inbound ports consumed by CLI adapters.

pub mod config;
pub mod deploy;
pub mod diagnostic;
pub mod model;
pub mod port;
pub mod template;
