// src/logging.rs

//! Diagnostics for the relay, on stderr next to the status line.
//!
//! Filter selection, first match wins:
//! - `--log-level LEVEL` raises or lowers the relay's own events; dependencies
//!   stay at `warn` so their chatter never drowns the status line.
//! - `APPRELAY_LOG` holds full `EnvFilter` directives, e.g.
//!   `apprelay::engine=debug,apprelay::census=trace`.
//! - Otherwise the relay logs at `info`.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_ENV_VAR: &str = "APPRELAY_LOG";

const DEFAULT_DIRECTIVES: &str = "warn,apprelay=info";

/// Install the global subscriber. Call once, before the relay starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());

    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?} (from {LOG_ENV_VAR}?)"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing the log subscriber: {e}"))
}

/// The `EnvFilter` directive string for a CLI level and the raw value of
/// [`LOG_ENV_VAR`].
pub fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return format!("warn,apprelay={}", level_name(level));
    }
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
