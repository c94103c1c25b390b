use clap::Parser;

use strata::adapter::inbound::cli::command::Cli;
use strata::adapter::inbound::cli::output::{self, OutputConfig};
use strata::adapter::inbound::cli::{config_path, diagnostic, operator, run};
use strata::infrastructure::operator::Operator;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _ = operator::install(Box::new(Operator));

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    let path = config_path(&cli);

    if let Err(e) = run(cli).await {
        if output::is_json() {
            output::error(&e.to_string());
        } else {
            let source = std::fs::read_to_string(&path).ok();
            let name = path.display().to_string();
            let report = diagnostic::report(e, source.as_deref().map(|text| (name.as_str(), text)));
            eprintln!("{report:?}");
        }
        std::process::exit(1);
    }
}
