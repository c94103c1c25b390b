//! Handler for `strata create`.

use serde_json::json;

use crate::adapter::inbound::cli::command::CreateArgs;
use crate::adapter::inbound::cli::operator::operator;
use crate::adapter::inbound::cli::output;
use crate::adapter::inbound::cli::progress::ProgressNotifier;
use crate::error::Result;
use crate::port::inbound::operator::deploy::{CreateRequest, DeploymentView};

/// Translate parsed arguments into a create request.
fn request(config_toml: &str, args: &CreateArgs) -> CreateRequest {
    CreateRequest {
        config_toml: config_toml.to_string(),
        app_name: args.name.clone(),
        template: args.template.clone(),
        params: args.params.clone(),
        publish: args.publish.clone(),
        skip_validation: args.skip_validation.clone(),
        skip_image_pull: args.skip_image_pull,
        skip_model_download: args.skip_model_download,
    }
}

/// Execute `create`.
pub async fn execute(config_toml: &str, args: &CreateArgs) -> Result<()> {
    let pb = output::spinner(&format!(
        "Deploying {} from {}",
        output::highlight(&args.name),
        args.template
    ));
    let progress = Box::new(ProgressNotifier::new(pb.clone()));

    let view = match operator().create(request(config_toml, args), progress).await {
        Ok(view) => view,
        Err(e) => {
            output::spinner_fail(&pb, &format!("Deployment of {} failed", args.name));
            return Err(e);
        }
    };
    output::spinner_success(&pb, &format!("Deployed {}", args.name));
    print_summary(&args.name, &view);
    Ok(())
}

fn print_summary(app: &str, view: &DeploymentView) {
    if output::is_json() {
        output::json_output(json!({
            "command": "create",
            "app": app,
            "run_id": view.run_id,
            "template": view.template,
            "state": view.state.to_string(),
            "layers": view.layers,
            "components": view.components,
            "devices_allocated": view.devices_allocated,
            "images_pulled": view.images_pulled,
            "models_downloaded": view.models_downloaded,
        }));
        return;
    }

    output::section("Deployment");
    output::field("Application", app);
    output::field("Template", &view.template);
    output::field("Run", output::muted(&view.run_id));
    output::field("Layers", view.layers);
    output::field("Components", view.components);
    output::field("Accelerators", view.devices_allocated);
    if !view.images_pulled.is_empty() {
        output::field("Images pulled", view.images_pulled.join(", "));
    }
    if !view.models_downloaded.is_empty() {
        output::field("Models", view.models_downloaded.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::adapter::inbound::cli::command::{Cli, Commands};

    fn args(argv: &[&str]) -> CreateArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Create(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn request_carries_arguments_and_config_content() {
        let request = request(
            "[images]\npull = false\n",
            &args(&[
                "strata", "create", "demo", "-t", "chat", "--params", "a.b=1",
                "--publish", "http=8080", "--skip-validation", "root",
                "--skip-model-download",
            ]),
        );

        assert_eq!(request.config_toml, "[images]\npull = false\n");
        assert_eq!(request.app_name, "demo");
        assert_eq!(request.params, vec![("a.b".to_string(), "1".to_string())]);
        assert_eq!(request.publish, vec![("http".to_string(), 8080)]);
        assert_eq!(request.skip_validation, vec!["root"]);
        assert!(!request.skip_image_pull);
        assert!(request.skip_model_download);
    }
}
