use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::analyse::cmd_analyse;
use super::env::{CliArgs, Commands};
use super::find::cmd_find;
use super::runtime::{init_logging, load_config, LoadedConfig};

pub async fn run() -> Result<ExitCode> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug, cli.log_format)?;
    info!("Starting game-relay v{}", env!("CARGO_PKG_VERSION"));

    let LoadedConfig { config, path } = load_config(cli.config.as_ref()).await?;
    info!(config = %path.display(), "configuration ready");

    let result = match cli.command {
        Commands::Analyse(args) => cmd_analyse(args, config).await,
        Commands::Find(args) => cmd_find(args, &config).await,
    };

    match result {
        Ok(true) => {
            info!("Command completed successfully");
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(err) => {
            error!("Command failed: {:#}", err);
            Err(err)
        }
    }
}
