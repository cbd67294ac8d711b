use std::process::ExitCode;

use candlestash::cli::Cli;
use candlestash::{Collector, StashError, registry};
use clap::Parser;
use tracing_subscriber::EnvFilter;

async fn run(cli: Cli) -> Result<(), StashError> {
    let dump = cli.dump_config;
    let cfg = cli.into_config()?;
    if dump {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| StashError::Data(format!("config encoding failed: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let connector = registry::connector_for(&cfg)?;
    tracing::info!(
        exchange = connector.name(),
        vendor = connector.vendor(),
        output_dir = %cfg.output_dir.display(),
        "initialized exchange"
    );
    let collector = Collector::builder()
        .with_connector(connector)
        .config(cfg)
        .build()?;
    let report = collector.run().await?;

    for w in report.all_warnings() {
        tracing::warn!(warning = %w, "completed with warning");
    }
    tracing::info!(
        symbols = report.symbols.len(),
        series = report.series_written,
        depth = report.depth_written,
        "data fetching process finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "collection failed");
            ExitCode::FAILURE
        }
    }
}
