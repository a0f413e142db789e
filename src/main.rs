use anyhow::Result;
use clap::Parser;
use parley_rs::cli::{self, commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config()?;

    let default_level = if config.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley_rs={}", default_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    commands::run(args.command, config).await
}
