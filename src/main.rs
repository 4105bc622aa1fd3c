use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use ah_receipts::{ReceiptMonitor, RefreshOutcome, Settings};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Poll Albert Heijn receipts and print the derived sensors as JSON.
#[derive(Debug, Parser)]
#[command(name = "ah-receipts", version)]
struct Cli {
    /// Settings file (JSON). Defaults to the per-user config file if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Access token; overrides the settings file and AH_ACCESS_TOKEN.
    #[arg(long)]
    token: Option<String>,

    /// Keep polling every scan interval instead of exiting after one update.
    #[arg(long)]
    watch: bool,

    /// Print single-line JSON.
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(token) = cli.token {
        settings.access_token = Some(token);
    }

    // Without a token there are no sensors to report.
    let mut monitor = match ReceiptMonitor::from_settings(&settings) {
        Ok(monitor) => monitor,
        Err(e) => {
            error!("Setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = monitor.update();
    info!(?outcome, "{}", monitor);
    if let Err(e) = print_readings(&monitor, cli.compact) {
        error!("Failed to write readings: {}", e);
        return ExitCode::FAILURE;
    }

    if !cli.watch {
        return ExitCode::SUCCESS;
    }

    loop {
        thread::sleep(settings.scan_interval());
        let outcome = monitor.update();
        if outcome == RefreshOutcome::Throttled {
            continue;
        }
        info!(?outcome, "{}", monitor);
        if let Err(e) = print_readings(&monitor, cli.compact) {
            error!("Failed to write readings: {}", e);
            return ExitCode::FAILURE;
        }
    }
}

fn print_readings(monitor: &ReceiptMonitor, compact: bool) -> ah_receipts::Result<()> {
    let readings = monitor.readings();
    let out = if compact {
        serde_json::to_string(&readings)?
    } else {
        serde_json::to_string_pretty(&readings)?
    };
    println!("{}", out);
    Ok(())
}
