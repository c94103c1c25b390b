//! Handlers for `strata models`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{ModelDownloadArgs, ModelListArgs};
use crate::adapter::inbound::cli::operator::operator;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::port::inbound::operator::model::ModelRequest;

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Present")]
    present: String,
}

/// Execute `models list`.
pub async fn execute_list(config_toml: &str, args: &ModelListArgs) -> Result<()> {
    let request = ModelRequest {
        config_toml: config_toml.to_string(),
        template: args.template.clone(),
        directory: args.dir.clone(),
        tool_image: None,
    };
    let listing = operator().list_models(&request).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "models.list",
            "template": listing.template,
            "directory": listing.directory.display().to_string(),
            "models": listing
                .models
                .iter()
                .map(|m| json!({ "model": m.model, "present": m.present }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section(&format!("Models for {}", listing.template));
    output::field("Directory", listing.directory.display());
    if listing.models.is_empty() {
        output::note("This template serves no models");
        return Ok(());
    }
    let missing = listing.models.iter().filter(|m| !m.present).count();
    let rows = listing
        .models
        .iter()
        .map(|m| ModelRow {
            model: m.model.clone(),
            present: output::status_mark(m.present),
        })
        .collect::<Vec<_>>();
    output::lines(&Table::new(rows).to_string());
    if missing > 0 {
        output::hint(&format!(
            "run `strata models download -t {}` to fetch {missing} missing model(s)",
            listing.template
        ));
    }
    Ok(())
}

/// Execute `models download`.
pub async fn execute_download(config_toml: &str, args: &ModelDownloadArgs) -> Result<()> {
    let request = ModelRequest {
        config_toml: config_toml.to_string(),
        template: args.template.clone(),
        directory: args.dir.clone(),
        tool_image: args.tool_image.clone(),
    };

    let pb = output::spinner(&format!("Downloading models for {}", args.template));
    let report = match operator().download_models(&request).await {
        Ok(report) => report,
        Err(e) => {
            output::spinner_fail(&pb, "Model download failed");
            return Err(e);
        }
    };
    output::spinner_success(
        &pb,
        &format!(
            "{} downloaded, {} already present",
            report.downloaded.len(),
            report.present.len()
        ),
    );

    if output::is_json() {
        output::json_output(json!({
            "command": "models.download",
            "template": report.template,
            "directory": report.directory.display().to_string(),
            "downloaded": report.downloaded,
            "present": report.present,
        }));
    } else {
        for model in &report.downloaded {
            output::field("Downloaded", model);
        }
    }
    Ok(())
}
