//! Application services (use cases).
//!
//! The orchestration core lives here: demand calculation, device
//! allocation, parameter building, layer execution, and readiness
//! verification. [`deploy::DeployService`] ties them together with the
//! preflight, tuning, model, and image steps that precede the first layer.

pub mod allocator;
pub mod demand;
pub mod deploy;
pub mod executor;
pub mod image;
pub mod model;
pub mod params;
pub mod preflight;
pub mod readiness;
pub mod tuning;

pub use allocator::{check_sufficient, DeviceAllocator};
pub use demand::{build_catalog, ResourceDemand};
pub use deploy::{
    load_template, resolve_template, DeployRequest, DeployService, DeploySettings, DeploySummary,
    LoadedTemplate,
};
pub use executor::{DeployContext, LayerExecutor, RunOutcome};
pub use image::{missing_images, pull_missing, rendered_images, required_images, RetryPolicy};
pub use model::{download_models, model_status, ModelReport, ModelStatus};
pub use params::{apply_overrides, ParameterBuilder};
pub use preflight::run_preflight;
pub use readiness::{readiness_timeout, Readiness, ReadinessVerifier, READINESS_GRACE};
pub use tuning::{apply_smt_target, apply_smt_target_off_worker, TuningOutcome};
