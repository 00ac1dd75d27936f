// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, RawRelayConfig, RelayConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw model.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file and validate it as a complete relay config.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RelayConfig> {
    let raw = load_from_path(path)?;
    RelayConfig::try_from(raw.relay)
}

/// Build the effective relay config from CLI flags and the optional config
/// file they point at.
///
/// Returns `Ok(None)` when neither source names a primary command, which the
/// caller answers with the help text.
pub fn resolve_config(args: &CliArgs) -> Result<Option<RelayConfig>> {
    let file = match &args.config {
        Some(path) => load_from_path(path)?.relay,
        None => RawRelayConfig::default(),
    };

    let merged = merge_cli_over_file(args, file);

    let has_primary = merged
        .primary
        .as_deref()
        .is_some_and(|cmd| !cmd.trim().is_empty());
    if !has_primary {
        return Ok(None);
    }

    RelayConfig::try_from(merged).map(Some)
}

/// CLI values win; the `windowed` switch can only turn the mode on.
pub fn merge_cli_over_file(args: &CliArgs, file: RawRelayConfig) -> RawRelayConfig {
    RawRelayConfig {
        primary: args.primary.clone().or(file.primary),
        followup: args.followup.clone().or(file.followup),
        icon: args.icon.clone().or(file.icon),
        title: args.title.clone().or(file.title),
        windowed: args.windowed || file.windowed,
        tick_ms: args.tick_ms.or(file.tick_ms),
        status_text_limit: file.status_text_limit,
    }
}
