//! freqprof CLI entry point.

use anyhow::Context;
use clap::Parser;

use freqprof::cli::{handle_error, Cli, Commands};
use freqprof::cli::commands::{search, testbench, validate};
use freqprof::infrastructure::config::ConfigLoader;
use freqprof::infrastructure::logging::LoggerImpl;

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Search(args) => search::execute(args, config, cli.json).await,
        Commands::Testbench(args) => testbench::execute(args, config, cli.json).await,
        Commands::Validate(args) => validate::execute(args, config, cli.json).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json);
    }
}
