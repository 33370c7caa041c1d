// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Video Analysis Daemon (vscand)
//!
//! Process entry point: loads configuration, starts the model cache, and
//! wires the submission/poll/result library surface (`VideoAnalysisService`)
//! a transport would sit in front of. No transport is wired up here, so the
//! binary drives a heartbeat loop over the service and idles otherwise.

use std::path::PathBuf;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use vscan_core::EngineConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("vscand {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("vscand {}", env!("CARGO_PKG_VERSION"));
                println!("Video Analysis Daemon - submits and drives video-analysis jobs");
                println!();
                println!("USAGE:");
                println!("    vscand [--config <path>]");
                println!();
                println!("OPTIONS:");
                println!("    --config <path>  Path to a TOML configuration file");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            "--config" => {}
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: vscand [--config <path>]");
                std::process::exit(1);
            }
        }
    }
    let config_path = config_path_from_args(std::env::args());

    setup_logging();

    let config = EngineConfig::load(config_path.as_deref())?;
    info!(
        max_concurrent_jobs = config.max_concurrent_jobs,
        workspace = %config.workspace_base_path.display(),
        pipeline_version = %config.pipeline_version,
        "starting video analysis daemon"
    );

    let vscan_daemon::Daemon { service, model_cache } = vscan_daemon::build(config);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut heartbeat = tokio::time::interval(Duration::from_secs(30));

    println!("READY");
    info!("daemon ready, idling with no transport wired up");

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                info!(loaded_models = model_cache.loaded_count(), "heartbeat");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, draining in-flight jobs");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, draining in-flight jobs");
                break;
            }
        }
    }

    service.drain(Duration::from_secs(config_drain_timeout())).await;
    model_cache.stop();
    info!("daemon stopped");
    Ok(())
}

fn config_path_from_args(args: impl Iterator<Item = String>) -> Option<PathBuf> {
    let mut args = args;
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn config_drain_timeout() -> u64 {
    std::env::var("VSCAN_DRAIN_TIMEOUT_SEC")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}

/// Stdout-only structured logging — no file rotation, since state does not
/// outlive the process.
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
