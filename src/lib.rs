// src/lib.rs

pub mod census;
pub mod cli;
pub mod command;
#[cfg(windows)]
pub mod com;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod icon;
pub mod logging;
pub mod status;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::resolve_config;
use crate::engine::{Collaborators, RelayCore, RelayEvent, RelayOutcome, Runtime, RuntimeOptions};
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags over the optional TOML file)
/// - platform launcher, window census and icon backend
/// - the platform status surface (tray icon on Windows, console elsewhere)
/// - Ctrl-C handling
/// - the relay runtime
///
/// Returns `Ok(None)` when there was nothing to relay and the help text was
/// printed instead.
pub async fn run(args: CliArgs) -> Result<Option<RelayOutcome>> {
    let Some(cfg) = resolve_config(&args)? else {
        cli::print_help()?;
        return Ok(None);
    };

    if cfg.windowed_mode && !census::census_supported() {
        warn!("windowed mode requested but window enumeration is unavailable here; relying on process exit only");
    }

    info!(
        primary = %cfg.primary_command,
        followup = ?cfg.followup_command,
        windowed = cfg.windowed_mode,
        "relay configured"
    );

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RelayEvent>(64);

    // Ctrl-C → user exit.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RelayEvent::ShutdownRequested).await;
        });
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let collaborators = Collaborators {
        launcher: exec::platform_launcher(),
        census: census::platform_census(),
        icons: icon::platform_backend(Arc::clone(&fs)),
        fs,
        surface: status::platform_surface(rt_tx.clone(), cfg.status_text_limit),
    };

    let core = RelayCore::new(cfg);
    let runtime = Runtime::new(core, collaborators, rt_tx, rt_rx, RuntimeOptions::default());
    let outcome = runtime.run().await?;

    Ok(Some(outcome))
}
