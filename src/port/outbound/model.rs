//! Model store port.

use std::path::Path;

use async_trait::async_trait;

use crate::error::ModelError;

/// Local store of the model weights a template's components serve.
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Directory models are kept under, one subdirectory per model.
    fn directory(&self) -> &Path;

    /// Whether `model` is already stored.
    async fn is_present(&self, model: &str) -> Result<bool, ModelError>;

    /// Fetch `model` into the store.
    async fn download(&self, model: &str) -> Result<(), ModelError>;
}
