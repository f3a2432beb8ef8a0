use anyhow::{Context, Result};
use clap::Parser;
use isubench_config::{BenchConfig, ConfigLoader};
use isubench_execution::shutdown_signal;
use isubench_logging::{admin, init_logging_from_config};
use isubench_scenario::Session;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod cli;
use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config {
        config_cmd: ConfigCommands::Sample,
    }) = &cli.command
    {
        print!("{}", BenchConfig::generate_sample());
        return Ok(());
    }

    let mut config = ConfigLoader::new()
        .load(cli.config.as_ref())
        .context("Failed to load configuration")?;
    cli.apply_overrides(&mut config)?;
    config.validate_all().context("Invalid configuration")?;

    init_logging_from_config(&config.logging)?;
    admin!("{}", config.describe());

    let exit_error_on_fail = config.target.exit_error_on_fail;
    let session = Arc::new(Session::new(config).context("Failed to set up the run")?);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping the run");
        on_signal.cancel();
    });

    let verdict = isubench_scenario::run(session, &cancel)
        .await
        .context("Benchmark run failed")?;

    if !verdict.passed && exit_error_on_fail {
        std::process::exit(1);
    }
    Ok(())
}
