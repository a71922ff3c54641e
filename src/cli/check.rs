//! Handler for the `check` command: one cycle, report printed.

use anyhow::Context;
use owo_colors::OwoColorize;

use crate::app::{App, Config, CycleReport};
use crate::cli::Cli;

/// Execute the check command.
pub async fn execute(cli: &Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    config.init_logging();

    let report = App::check_once(config).await.context("check cycle failed")?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &CycleReport) {
    if report.skipped {
        println!("{}", "Cycle skipped: another cycle is in progress".yellow());
        return;
    }

    println!("{}", "Check cycle complete".green().bold());
    println!("  roasteries checked   {}", report.roasteries_checked);
    if report.roasteries_failed > 0 {
        println!(
            "  roasteries failed    {}",
            report.roasteries_failed.to_string().red()
        );
    }
    println!("  observations         {}", report.observations);
    println!("  newly available      {}", report.newly_available);
    println!("  newly unavailable    {}", report.newly_unavailable);
    println!("  swept (missing)      {}", report.swept_missing);
    println!("  tagged               {}", report.tagged);
    println!(
        "  notifications sent   {}",
        report.notifications_sent.to_string().cyan()
    );
}
