//! Podman container runtime adapter.
//!
//! Implements [`ContainerRuntime`](crate::port::ContainerRuntime) by shelling
//! out to the podman CLI, and [`ModelStore`](crate::port::ModelStore) by
//! running a downloader image through it.

pub mod client;
pub mod model;
pub mod report;

pub use client::PodmanRuntime;
pub use model::PodmanModelStore;
