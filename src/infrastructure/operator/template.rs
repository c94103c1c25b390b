//! Template and image operator implementation.

use async_trait::async_trait;

use crate::application::{load_template, missing_images, pull_missing, required_images};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;
use crate::port::inbound::operator::template::{
    ImageListing, ImagePullReport, ImageStatus, TemplateListing, TemplateOperator,
    TemplateSummary,
};
use crate::port::TemplateRepository;

use super::entry::Operator;

async fn summaries(repo: &dyn TemplateRepository, hidden: bool) -> Result<Vec<TemplateSummary>> {
    let mut summaries = Vec::new();
    for name in repo.list_templates(hidden).await? {
        let metadata = repo.load_metadata(&name).await?;
        summaries.push(TemplateSummary {
            components: metadata.layers.iter().map(Vec::len).sum(),
            layers: metadata.layers.len(),
            models: metadata.models.len(),
            name: metadata.name,
            version: metadata.version,
            description: metadata.description.unwrap_or_default(),
        });
    }
    Ok(summaries)
}

#[async_trait]
impl TemplateOperator for Operator {
    async fn list_templates(
        &self,
        config_toml: &str,
        include_hidden: bool,
    ) -> Result<TemplateListing> {
        let config = Config::parse_toml(config_toml)?;
        let repo = bootstrap::build_templates(&config);

        Ok(TemplateListing {
            templates: summaries(repo.as_ref(), include_hidden).await?,
            root: config.templates.root,
        })
    }

    async fn list_images(&self, config_toml: &str, template: &str) -> Result<ImageListing> {
        let config = Config::parse_toml(config_toml)?;
        let templates = bootstrap::build_templates(&config);
        let runtime = bootstrap::build_runtime(&config);
        let loaded = load_template(templates.as_ref(), template).await?;
        let required = required_images(&loaded.catalog);
        let missing = missing_images(runtime.as_ref(), &required).await?;

        Ok(ImageListing {
            template: loaded.template.name().to_string(),
            images: required
                .into_iter()
                .map(|image| ImageStatus {
                    present: !missing.contains(&image),
                    image,
                })
                .collect(),
        })
    }

    async fn pull_images(&self, config_toml: &str, template: &str) -> Result<ImagePullReport> {
        let config = Config::parse_toml(config_toml)?;
        let templates = bootstrap::build_templates(&config);
        let runtime = bootstrap::build_runtime(&config);
        let loaded = load_template(templates.as_ref(), template).await?;
        let required = required_images(&loaded.catalog);

        let pulled = pull_missing(runtime.as_ref(), &required, config.images.retry_policy()).await?;

        Ok(ImagePullReport {
            template: loaded.template.name().to_string(),
            present: required.len() - pulled.len(),
            pulled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::pod_yaml;
    use crate::testkit::template::InMemoryTemplates;

    #[tokio::test]
    async fn summaries_count_layers_components_and_models() {
        let repo = InMemoryTemplates::new("Chat")
            .with_layers(&[&["db"], &["api", "ui"]])
            .with_model("granite")
            .with_component("db", &pod_yaml("db", &[("db", 0)]))
            .with_component("api", &pod_yaml("api", &[("api", 0)]))
            .with_component("ui", &pod_yaml("ui", &[("ui", 0)]));

        let summaries = summaries(&repo, false).await.unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Chat");
        assert_eq!(summaries[0].layers, 2);
        assert_eq!(summaries[0].components, 3);
        assert_eq!(summaries[0].models, 1);
    }

    #[tokio::test]
    async fn hidden_templates_need_the_flag() {
        let repo = InMemoryTemplates::new("Internal").hidden();

        assert!(summaries(&repo, false).await.unwrap().is_empty());
        assert_eq!(summaries(&repo, true).await.unwrap().len(), 1);
    }
}
