//! Radio Switch - command-line host for the Sonos radio switch.
//!
//! Runs a single on/off/status operation, or serves the bridge line protocol
//! on stdin for deployments behind a smart-home bridge.

mod bridge;
mod config;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use radio_core::sonos::create_http_client;
use radio_core::{
    DeviceController, RadioSwitch, SonosClient, SonosClientImpl, TokioSpawner, TrackedSpawner,
};
use tokio::signal;

use crate::config::AppConfig;

/// Radio Switch - play one internet radio station on every Sonos speaker.
#[derive(Parser, Debug)]
#[command(name = "radio-switch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "RADIO_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Speaker address to use instead of SSDP discovery (overrides config file).
    #[arg(short = 'd', long, env = "RADIO_DEVICE_IP")]
    device_ip: Option<IpAddr>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Group every speaker and start the station.
    On,
    /// Stop every group.
    Off,
    /// Print `on` if any group is playing, `off` otherwise.
    Status,
    /// Serve on/off/status commands from stdin.
    Bridge,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Radio Switch v{}", env!("CARGO_PKG_VERSION"));

    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(ip) = args.device_ip {
        config.set_device_ip(ip);
    }

    let core_config = config.core;
    core_config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    match &core_config.device_ip {
        Some(ip) => log::info!("Configuration: device_ip={}", ip),
        None => log::info!("Configuration: device_ip=auto (SSDP)"),
    }

    let http = create_http_client().context("Failed to create HTTP client")?;
    let sonos: Arc<dyn SonosClient> = Arc::new(
        SonosClientImpl::new(http, core_config.ssdp_config())
            .with_device_ip(core_config.device_ip.clone()),
    );

    let spawner = TokioSpawner::current();
    let controller = Arc::new(DeviceController::new(sonos, &core_config, &spawner));

    match args.command {
        Command::On => controller.play().await,
        Command::Off => controller.pause().await,
        Command::Status => {
            let on = controller
                .status()
                .await
                .context("Failed to query radio state")?;
            println!("{}", if on { "on" } else { "off" });
        }
        Command::Bridge => {
            let requests = TrackedSpawner::current();
            bridge::run(
                RadioSwitch::new(controller, requests.clone()),
                shutdown_signal(),
            )
            .await?;

            let pending = requests.pending();
            if pending > 0 {
                log::info!("Waiting for {} pending request(s)", pending);
            }
            if !requests.drain(core_config.operation_timeout()).await {
                log::warn!(
                    "Gave up on {} request(s) after {}s",
                    requests.pending(),
                    core_config.operation_timeout().as_secs()
                );
            }
        }
    }

    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed, that signal is never reported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
