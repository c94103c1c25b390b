//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! orchestration logic: configuration loading, well-known paths, the
//! composition root, and the operator behind the CLI.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`operator`] - Inbound operator port implementation
//! - [`paths`] - Default locations under `~/.strata/`

pub mod bootstrap;
pub mod config;
pub mod operator;
pub mod paths;
