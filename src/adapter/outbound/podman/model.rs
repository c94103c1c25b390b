//! Model downloads through a tool container.
//!
//! The host needs nothing beyond the container engine: a tool image carrying
//! the Hugging Face CLI runs with the model directory mounted and writes each
//! model to `<directory>/<model>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::client::PodmanRuntime;
use crate::error::ModelError;
use crate::port::ModelStore;

/// Mount point of the model directory inside the tool container.
const CONTAINER_MODEL_DIR: &str = "/models";

/// [`ModelStore`] backed by a host directory and a downloader image.
#[derive(Debug, Clone)]
pub struct PodmanModelStore {
    runtime: PodmanRuntime,
    tool_image: String,
    directory: PathBuf,
}

impl PodmanModelStore {
    pub fn new(
        runtime: PodmanRuntime,
        tool_image: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runtime,
            tool_image: tool_image.into(),
            directory: directory.into(),
        }
    }

    /// Arguments for the tool container that downloads `model`.
    #[must_use]
    pub fn download_args(&self, model: &str) -> Vec<String> {
        vec![
            "run".into(),
            "--rm".into(),
            "-v".into(),
            format!("{}:{CONTAINER_MODEL_DIR}:Z", self.directory.display()),
            self.tool_image.clone(),
            "hf".into(),
            "download".into(),
            model.into(),
            "--local-dir".into(),
            format!("{CONTAINER_MODEL_DIR}/{model}"),
        ]
    }

    fn model_dir(&self, model: &str) -> PathBuf {
        self.directory.join(model)
    }
}

#[async_trait]
impl ModelStore for PodmanModelStore {
    fn directory(&self) -> &Path {
        &self.directory
    }

    async fn is_present(&self, model: &str) -> Result<bool, ModelError> {
        let path = self.model_dir(model);
        let mut entries = match tokio::fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(source) => return Err(ModelError::Directory { path, source }),
        };
        let first = entries
            .next_entry()
            .await
            .map_err(|source| ModelError::Directory {
                path: path.clone(),
                source,
            })?;
        Ok(first.is_some())
    }

    async fn download(&self, model: &str) -> Result<(), ModelError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| ModelError::Directory {
                path: self.directory.clone(),
                source,
            })?;

        debug!(model, image = %self.tool_image, "Starting model download container");
        self.runtime
            .run(&self.download_args(model), None)
            .await
            .map_err(|source| ModelError::Download {
                model: model.to_string(),
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store(binary: &str, directory: &Path) -> PodmanModelStore {
        PodmanModelStore::new(PodmanRuntime::new(binary), "tools:1", directory)
    }

    #[test]
    fn download_runs_the_tool_image_with_the_directory_mounted() {
        let store = store("podman", Path::new("/var/lib/strata/models"));

        assert_eq!(
            store.download_args("ibm-granite/granite-3.3-8b-instruct"),
            vec![
                "run",
                "--rm",
                "-v",
                "/var/lib/strata/models:/models:Z",
                "tools:1",
                "hf",
                "download",
                "ibm-granite/granite-3.3-8b-instruct",
                "--local-dir",
                "/models/ibm-granite/granite-3.3-8b-instruct",
            ]
        );
    }

    #[tokio::test]
    async fn only_non_empty_model_directories_count_as_present() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("org/empty")).unwrap();
        std::fs::create_dir_all(dir.path().join("org/full")).unwrap();
        std::fs::write(dir.path().join("org/full/config.json"), "{}").unwrap();
        let store = store("podman", dir.path());

        assert!(store.is_present("org/full").await.unwrap());
        assert!(!store.is_present("org/empty").await.unwrap());
        assert!(!store.is_present("org/absent").await.unwrap());
    }

    #[tokio::test]
    async fn failed_tool_container_is_a_download_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("models");

        let err = store("false", &target).download("granite").await.unwrap_err();

        assert!(matches!(err, ModelError::Download { ref model, .. } if model == "granite"));
        assert!(target.is_dir());
    }
}
