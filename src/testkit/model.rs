//! Model store that records downloads instead of fetching anything.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ModelError, RuntimeError};
use crate::port::ModelStore;

/// In-memory [`ModelStore`]. A successful download makes the model present.
#[derive(Debug)]
pub struct RecordingModelStore {
    directory: PathBuf,
    failures: BTreeSet<String>,
    present: Mutex<BTreeSet<String>>,
    downloads: Mutex<Vec<String>>,
}

impl RecordingModelStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            failures: BTreeSet::new(),
            present: Mutex::new(BTreeSet::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    /// Report `model` as already stored.
    #[must_use]
    pub fn with_model(self, model: &str) -> Self {
        self.present.lock().insert(model.to_string());
        self
    }

    /// Fail every download of `model`.
    #[must_use]
    pub fn with_failure(mut self, model: &str) -> Self {
        self.failures.insert(model.to_string());
        self
    }

    /// Models downloaded, in call order.
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().clone()
    }
}

#[async_trait]
impl ModelStore for RecordingModelStore {
    fn directory(&self) -> &Path {
        &self.directory
    }

    async fn is_present(&self, model: &str) -> Result<bool, ModelError> {
        Ok(self.present.lock().contains(model))
    }

    async fn download(&self, model: &str) -> Result<(), ModelError> {
        if self.failures.contains(model) {
            return Err(ModelError::Download {
                model: model.to_string(),
                source: RuntimeError::Rejected("scripted download failure".into()),
            });
        }
        self.downloads.lock().push(model.to_string());
        self.present.lock().insert(model.to_string());
        Ok(())
    }
}
