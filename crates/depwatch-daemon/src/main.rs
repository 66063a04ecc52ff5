#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Dependents watch daemon: on a fixed cadence, fetches the dependents of a
//! watched npm package and forwards fresh unscoped ones to the scanner.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use depwatch_daemon::config::{self, Config};
use depwatch_daemon::registry::RegistryClient;
use depwatch_daemon::scanner::ScannerClient;
use depwatch_daemon::scheduler::{self, FailurePolicy};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Outbound request timeout shared by both clients.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "depwatch-daemon", version, about = "npm dependents triage daemon")]
struct Cli {
    /// Path to the JSON settings file (apikey, interval, target).
    /// Defaults to `.config`, or the mounted secret when `DOCKER` is set.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit the process when a cycle fails instead of waiting for the next
    /// tick.
    #[arg(long, default_value_t = false)]
    exit_on_cycle_error: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let path = cli.config.unwrap_or_else(config::default_path);
    let config = Config::load(&path)?;
    info!(
        dependency = %config.target,
        lookback_hours = config.lookback_hours,
        "initialised"
    );

    let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let registry = RegistryClient::new(http.clone());
    let scanner = ScannerClient::new(http, config.api_key.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let policy = if cli.exit_on_cycle_error {
        FailurePolicy::Exit
    } else {
        FailurePolicy::Continue
    };
    scheduler::run(&config, &registry, &scanner, policy, shutdown_rx).await
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
