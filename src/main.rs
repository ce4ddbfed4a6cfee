use anyhow::Result;
use clap::Parser;
use dfreport::cli::{Cli, Commands};
use dfreport::commands;
use dfreport::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => commands::run::run_single(&config),
        Commands::Batch => commands::batch::run_batch(&config),
    }
}
