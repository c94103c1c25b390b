//! Handler for `strata templates`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::operator::operator;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::port::inbound::operator::template::TemplateSummary;

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Layers")]
    layers: usize,
    #[tabled(rename = "Components")]
    components: usize,
    #[tabled(rename = "Models")]
    models: usize,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&TemplateSummary> for TemplateRow {
    fn from(summary: &TemplateSummary) -> Self {
        Self {
            name: summary.name.clone(),
            version: summary.version.clone(),
            layers: summary.layers,
            components: summary.components,
            models: summary.models,
            description: summary.description.clone(),
        }
    }
}

/// Execute `templates`.
pub async fn execute(config_toml: &str, hidden: bool) -> Result<()> {
    let listing = operator().list_templates(config_toml, hidden).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "templates",
            "root": listing.root.display().to_string(),
            "templates": listing
                .templates
                .iter()
                .map(|t| json!({
                    "name": t.name,
                    "version": t.version,
                    "layers": t.layers,
                    "components": t.components,
                    "models": t.models,
                    "description": t.description,
                }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Application templates");
    if listing.templates.is_empty() {
        output::note(&format!("No templates under {}", listing.root.display()));
        output::hint("set templates.root in the config or STRATA_TEMPLATE_ROOT");
        return Ok(());
    }
    let rows = listing.templates.iter().map(TemplateRow::from).collect::<Vec<_>>();
    output::lines(&Table::new(rows).to_string());
    Ok(())
}
