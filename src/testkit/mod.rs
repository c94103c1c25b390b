//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`runtime`] - `ScriptedRuntime`, an in-memory
//!   [`ContainerRuntime`](crate::port::ContainerRuntime) with scripted health,
//!   failures, and delays.
//! - [`template`] - `InMemoryTemplates`, a template repository built in code.
//! - [`notifier`] - `RecordingNotifier`, which keeps every event it sees.
//! - [`model`] - `RecordingModelStore`, which records downloads.
//! - [`domain`] - Builders for pod manifests and identifiers.

pub mod domain;
pub mod model;
pub mod notifier;
pub mod runtime;
pub mod template;
