//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the seams between the orchestration core and the systems it
//! drives. Adapters implement them; the application layer only ever sees
//! the traits.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │Template │            │  Container  │              │  Device   │
//! │  Repo   │            │   Runtime   │              │ Discovery │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Inbound Ports
//!
//! - [`inbound::operator::port::OperatorPort`] - Every operator use case the
//!   CLI drives: deployment, templates and images, models, host checks, and
//!   configuration
//!
//! # Outbound Ports
//!
//! - [`TemplateRepository`] - Application templates and component rendering
//! - [`ContainerRuntime`] - Deploy, inspect, wait, and image management
//! - [`DeviceDiscovery`] - Free accelerator enumeration
//! - [`ModelStore`] - Model weights kept on the host
//! - [`Rule`] / [`RuleRegistry`] - Host preflight checks
//! - [`HostTuner`] - Host tuning ahead of a deployment
//! - [`Notifier`] / [`NotifierRegistry`] - Advisory progress events

pub mod inbound;
pub mod outbound;

pub use outbound::device::DeviceDiscovery;
pub use outbound::host::HostTuner;
pub use outbound::model::ModelStore;
pub use outbound::notifier::{Event, Notifier, NotifierRegistry};
pub use outbound::preflight::{
    PreflightReport, Rule, RuleLevel, RuleOutcome, RuleRegistry, RuleStatus, RuleViolation,
};
pub use outbound::runtime::{
    ContainerHealth, ContainerRuntime, DeployReport, ImageSummary, PodReport,
};
pub use outbound::template::{ConcreteSpec, RenderableSpec, TemplateRepository};
