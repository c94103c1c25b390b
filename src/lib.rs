//! Strata - layered, accelerator-aware deployment of container applications.
//!
//! An application template is a set of components grouped into ordered
//! layers. Strata deploys each layer's components concurrently, hands every
//! container its share of a host's accelerator devices, and waits for every
//! container to become healthy before the next layer starts.
//!
//! # Architecture
//!
//! The crate is laid out hexagonally:
//!
//! - [`domain`] - Pure types: ids, annotation schema, component catalog,
//!   templates and layers, render parameters, run state
//! - [`port`] - The operator surface the CLI drives, and traits for every
//!   external collaborator
//! - [`application`] - Demand, allocation, parameters, layer execution,
//!   readiness, and the end-to-end deploy service
//! - [`adapter`] - Filesystem templates, podman and model downloads, sysfs
//!   discovery, preflight rules, host tuning, and the CLI
//! - [`infrastructure`] - Configuration, wiring, and the operator behind the
//!   CLI
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use strata::infrastructure::bootstrap;
//! use strata::infrastructure::config::Config;
//! use strata::application::DeployRequest;
//!
//! # async fn run() -> strata::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let service = bootstrap::build_deploy_service(&config, bootstrap::build_notifier_registry(vec![]));
//! let summary = service
//!     .deploy(DeployRequest {
//!         app_name: "demo".into(),
//!         template: "chat".into(),
//!         pull_images: true,
//!         ..DeployRequest::default()
//!     })
//!     .await?;
//! println!("{} layers deployed", summary.layers);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
