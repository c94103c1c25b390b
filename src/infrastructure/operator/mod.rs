//! Operator implementations for inbound adapters.

pub mod config;
pub mod deploy;
pub mod diagnostic;
pub mod entry;
pub mod model;
pub mod template;

pub use entry::Operator;
