//! Handlers for `strata images`.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::operator::operator;
use crate::adapter::inbound::cli::output;
use crate::error::Result;

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "Image")]
    image: String,
    #[tabled(rename = "Present")]
    present: String,
}

/// Execute `images list`.
pub async fn execute_list(config_toml: &str, template: &str) -> Result<()> {
    let listing = operator().list_images(config_toml, template).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "images.list",
            "template": listing.template,
            "images": listing
                .images
                .iter()
                .map(|i| json!({ "image": i.image, "present": i.present }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section(&format!("Images for {}", listing.template));
    let rows = listing
        .images
        .iter()
        .map(|i| ImageRow {
            image: i.image.clone(),
            present: output::status_mark(i.present),
        })
        .collect::<Vec<_>>();
    output::lines(&Table::new(rows).to_string());
    let missing = listing.missing();
    if missing > 0 {
        output::hint(&format!(
            "run `strata images pull -t {}` to fetch {missing} missing image(s)",
            listing.template
        ));
    }
    Ok(())
}

/// Execute `images pull`.
pub async fn execute_pull(config_toml: &str, template: &str) -> Result<()> {
    let pb = output::spinner(&format!("Pulling images for {template}"));
    let report = match operator().pull_images(config_toml, template).await {
        Ok(report) => report,
        Err(e) => {
            output::spinner_fail(&pb, "Image pull failed");
            return Err(e);
        }
    };
    output::spinner_success(
        &pb,
        &format!(
            "{} pulled, {} already present",
            report.pulled.len(),
            report.present
        ),
    );

    if output::is_json() {
        output::json_output(json!({
            "command": "images.pull",
            "template": report.template,
            "pulled": report.pulled,
        }));
    } else {
        for image in &report.pulled {
            output::field("Pulled", image);
        }
    }
    Ok(())
}
