//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the orchestrator drives:
//! template storage, the container runtime, device discovery, the model
//! store, host checks and tuning, and notifications.

pub mod device;
pub mod host;
pub mod model;
pub mod notifier;
pub mod preflight;
pub mod runtime;
pub mod template;
