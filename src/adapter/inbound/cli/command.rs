//! Command-line interface definitions.
//!
//! Defines the CLI structure for the strata application using `clap`.
//! The CLI deploys applications from templates, lists templates with their
//! images and models, runs host checks, and inspects configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Layered, accelerator-aware deployment of multi-component applications
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: ~/.strata/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the strata CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy an application from a template
    Create(CreateArgs),

    /// List available application templates
    Templates(TemplatesArgs),

    /// Inspect or pull the images a template needs
    #[command(subcommand)]
    Images(ImagesCommand),

    /// Inspect or download the models a template serves
    #[command(subcommand)]
    Models(ModelsCommand),

    /// Run host preflight checks
    Check(CheckArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for the `create` subcommand.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Application name, exposed to templates as `AppName`.
    pub name: String,

    /// Application template to deploy (case-insensitive).
    #[arg(short, long)]
    pub template: String,

    /// Template value overrides as `dotted.key=value`, comma-separated.
    #[arg(long, value_delimiter = ',', value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Host ports for exposed container ports as `portName=hostPort`.
    #[arg(long, value_delimiter = ',', value_parser = parse_publish)]
    pub publish: Vec<(String, u16)>,

    /// Preflight checks to skip, by name.
    #[arg(long, value_delimiter = ',')]
    pub skip_validation: Vec<String>,

    /// Deploy without pulling missing images first.
    #[arg(long)]
    pub skip_image_pull: bool,

    /// Deploy without downloading the template's models first.
    #[arg(long)]
    pub skip_model_download: bool,
}

/// Arguments for the `templates` subcommand.
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Include hidden templates.
    #[arg(long)]
    pub hidden: bool,
}

/// Subcommands for `strata images`.
#[derive(Subcommand, Debug)]
pub enum ImagesCommand {
    /// List the images a template needs and whether they are present.
    List(TemplateArg),
    /// Pull every missing image a template needs.
    Pull(TemplateArg),
}

/// Shared argument struct for commands that act on one template.
#[derive(Args, Debug)]
pub struct TemplateArg {
    /// Application template name (case-insensitive).
    #[arg(short, long)]
    pub template: String,
}

/// Subcommands for `strata models`.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List the models a template serves and whether they are stored.
    List(ModelListArgs),
    /// Download every model a template serves that is not stored yet.
    Download(ModelDownloadArgs),
}

/// Arguments for `models list`.
#[derive(Args, Debug)]
pub struct ModelListArgs {
    /// Application template name (case-insensitive).
    #[arg(short, long)]
    pub template: String,

    /// Model directory [default: models.directory from the config]
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for `models download`.
#[derive(Args, Debug)]
pub struct ModelDownloadArgs {
    /// Application template name (case-insensitive).
    #[arg(short, long)]
    pub template: String,

    /// Model directory [default: models.directory from the config]
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Image carrying the download tool.
    #[arg(long, hide = true)]
    pub tool_image: Option<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Preflight checks to skip, by name.
    #[arg(long, value_delimiter = ',')]
    pub skip_validation: Vec<String>,
}

/// Subcommands for `strata config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file for correctness.
    Validate,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn parse_publish(raw: &str) -> Result<(String, u16), String> {
    let (name, port) = parse_param(raw)?;
    let port: u16 = port
        .parse()
        .map_err(|_| format!("invalid host port in '{raw}'"))?;
    if port == 0 {
        return Err(format!("host port must be non-zero in '{raw}'"));
    }
    Ok((name, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_factory_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_name_and_version() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "strata");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn parse_create_with_lists() {
        let cli = Cli::try_parse_from([
            "strata",
            "create",
            "demo",
            "-t",
            "RAG",
            "--params",
            "model.name=granite,replicas=2",
            "--publish",
            "http=8080,metrics=9090",
            "--skip-validation",
            "numa,root",
            "--skip-image-pull",
            "--skip-model-download",
        ])
        .unwrap();

        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.name, "demo");
        assert_eq!(args.template, "RAG");
        assert_eq!(
            args.params,
            vec![
                ("model.name".to_string(), "granite".to_string()),
                ("replicas".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(
            args.publish,
            vec![("http".to_string(), 8080), ("metrics".to_string(), 9090)]
        );
        assert_eq!(args.skip_validation, vec!["numa", "root"]);
        assert!(args.skip_image_pull);
        assert!(args.skip_model_download);
    }

    #[test]
    fn create_requires_template() {
        assert!(Cli::try_parse_from(["strata", "create", "demo"]).is_err());
    }

    #[test]
    fn malformed_param_is_rejected() {
        let result = Cli::try_parse_from(["strata", "create", "demo", "-t", "x", "--params", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_host_port_is_rejected() {
        let result = Cli::try_parse_from(["strata", "create", "demo", "-t", "x", "--publish", "http=0"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "strata", "templates", "--hidden", "--json", "-vv", "-c", "/tmp/s.toml",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
        assert!(matches!(cli.command, Commands::Templates(TemplatesArgs { hidden: true })));
    }

    #[test]
    fn images_subcommands() {
        let cli = Cli::try_parse_from(["strata", "images", "pull", "-t", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Images(ImagesCommand::Pull(_))));
    }

    #[test]
    fn models_subcommands() {
        let cli = Cli::try_parse_from([
            "strata", "models", "download", "-t", "chat", "--dir", "/srv/models",
            "--tool-image", "tools:1",
        ])
        .unwrap();
        let Commands::Models(ModelsCommand::Download(args)) = cli.command else {
            panic!("expected models download");
        };
        assert_eq!(args.template, "chat");
        assert_eq!(args.dir, Some(PathBuf::from("/srv/models")));
        assert_eq!(args.tool_image.as_deref(), Some("tools:1"));

        let cli = Cli::try_parse_from(["strata", "models", "list", "-t", "chat"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Models(ModelsCommand::List(ModelListArgs { dir: None, .. }))
        ));
    }

    #[test]
    fn config_subcommands() {
        let cli = Cli::try_parse_from(["strata", "config", "validate"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommand::Validate)));
    }
}
