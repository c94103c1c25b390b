//! CLI module graph and command dispatch.
//!
//! Handlers reach the rest of the crate only through the operator installed
//! with [`operator::install`].

pub mod check;
pub mod command;
pub mod config;
pub mod create;
pub mod diagnostic;
pub mod images;
pub mod models;
pub mod operator;
pub mod output;
pub mod progress;
pub mod templates;

use std::path::PathBuf;

use tracing::debug;

use self::command::{Cli, Commands, ConfigCommand, ImagesCommand, ModelsCommand};
use self::operator::operator;
use crate::error::Result;

/// Configuration file the command reads: `--config`, or the default path.
#[must_use]
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .unwrap_or_else(|| operator().default_config_path())
}

/// Read configuration content for a command.
///
/// An explicit `--config` must exist; a missing default file means defaults.
pub fn load_config_toml(cli: &Cli) -> Result<String> {
    match &cli.config {
        Some(path) => operator::read_config_toml(path),
        None => operator::read_config_toml_or_empty(&operator().default_config_path()),
    }
}

/// Run the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let path = config_path(&cli);
    if let Commands::Config(ConfigCommand::Validate) = &cli.command {
        operator().init_logging("", cli.verbose);
        return config::execute_validate(&path);
    }

    let config_toml = load_config_toml(&cli)?;
    operator().init_logging(&config_toml, cli.verbose);
    debug!(path = %path.display(), "Configuration loaded");

    match &cli.command {
        Commands::Create(args) => create::execute(&config_toml, args).await,
        Commands::Templates(args) => templates::execute(&config_toml, args.hidden).await,
        Commands::Images(ImagesCommand::List(arg)) => {
            images::execute_list(&config_toml, &arg.template).await
        }
        Commands::Images(ImagesCommand::Pull(arg)) => {
            images::execute_pull(&config_toml, &arg.template).await
        }
        Commands::Models(ModelsCommand::List(args)) => {
            models::execute_list(&config_toml, args).await
        }
        Commands::Models(ModelsCommand::Download(args)) => {
            models::execute_download(&config_toml, args).await
        }
        Commands::Check(args) => check::execute(&config_toml, &args.skip_validation),
        Commands::Config(ConfigCommand::Show) => config::execute_show(&config_toml),
        Commands::Config(ConfigCommand::Validate) => config::execute_validate(&path),
    }
}
