//! Deployment operator implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::application::DeployRequest;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::port::inbound::operator::deploy::{CreateRequest, DeploymentOperator, DeploymentView};
use crate::port::Notifier;

use super::entry::Operator;

/// Merge a create request with what the configuration says.
fn deploy_request(config: &Config, request: CreateRequest) -> DeployRequest {
    DeployRequest {
        skip_checks: config.preflight.skips_with(&request.skip_validation),
        pull_images: config.images.pull && !request.skip_image_pull,
        download_models: config.models.download && !request.skip_model_download,
        app_name: request.app_name,
        template: request.template,
        value_overrides: request.params.into_iter().collect(),
        host_ports: request.publish.into_iter().collect(),
    }
}

#[async_trait]
impl DeploymentOperator for Operator {
    async fn create(
        &self,
        request: CreateRequest,
        progress: Box<dyn Notifier>,
    ) -> Result<DeploymentView> {
        let config = Config::parse_toml(&request.config_toml)?;
        let notifiers = bootstrap::build_notifier_registry(vec![progress]);
        let service = bootstrap::build_deploy_service(&config, notifiers);

        let request = deploy_request(&config, request);
        debug!(
            app = %request.app_name,
            pull_images = request.pull_images,
            download_models = request.download_models,
            "Create request resolved"
        );
        let summary = service.deploy(request).await?;

        Ok(DeploymentView {
            run_id: summary.run_id,
            template: summary.template,
            state: summary.state,
            layers: summary.layers,
            components: summary.components,
            devices_allocated: summary.devices_allocated,
            images_pulled: summary.images_pulled,
            models_downloaded: summary.models_downloaded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(app: &str) -> CreateRequest {
        CreateRequest {
            app_name: app.into(),
            template: "chat".into(),
            ..CreateRequest::default()
        }
    }

    #[test]
    fn request_merges_configured_and_requested_skips() {
        let mut config = Config::default();
        config.preflight.skip = vec!["numa".into()];

        let request = deploy_request(
            &config,
            CreateRequest {
                params: vec![("a.b".into(), "1".into())],
                publish: vec![("http".into(), 8080)],
                skip_validation: vec!["root".into()],
                ..create("demo")
            },
        );

        assert_eq!(request.app_name, "demo");
        assert_eq!(request.skip_checks, vec!["numa", "root"]);
        assert_eq!(request.value_overrides.get("a.b"), Some(&"1".to_string()));
        assert_eq!(request.host_ports.get("http"), Some(&8080));
        assert!(request.pull_images);
        assert!(request.download_models);
    }

    #[test]
    fn image_pull_honours_flag_and_config() {
        let mut config = Config::default();
        let flagged = CreateRequest {
            skip_image_pull: true,
            ..create("demo")
        };
        assert!(!deploy_request(&config, flagged).pull_images);

        config.images.pull = false;
        assert!(!deploy_request(&config, create("demo")).pull_images);
    }

    #[test]
    fn model_download_honours_flag_and_config() {
        let mut config = Config::default();
        let flagged = CreateRequest {
            skip_model_download: true,
            ..create("demo")
        };
        assert!(!deploy_request(&config, flagged).download_models);

        config.models.download = false;
        assert!(!deploy_request(&config, create("demo")).download_models);
    }
}
