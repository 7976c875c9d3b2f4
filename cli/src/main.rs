use clap::Parser;
use colored::Colorize;
use presentation::cli::{Cli, CliApp};
use shared::telemetry;

#[tokio::main]
async fn main() {
    telemetry::init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let app = CliApp::from_env()?;
    app.run(cli).await
}
