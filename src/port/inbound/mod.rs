//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`operator`]: Operator-facing use cases for deployment, templates,
//!   images, models, host checks, and configuration

pub mod operator;
