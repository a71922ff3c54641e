//! Handler for the `run` command.

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use crate::app::{App, Config};
use crate::cli::{Cli, RunArgs};

/// Execute the run command.
pub async fn execute(cli: &Cli, args: &RunArgs) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();
    info!("beanwatch starting");

    tokio::select! {
        result = App::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("beanwatch stopped");
    Ok(())
}
