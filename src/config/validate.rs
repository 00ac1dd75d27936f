// src/config/validate.rs

use crate::config::model::{RawRelayConfig, RelayConfig};
use crate::errors::{RelayError, Result};

/// Smallest status text ceiling we accept; below this the ellipsis eats
/// most of the text.
pub const MIN_STATUS_TEXT_LIMIT: usize = 16;

/// Largest status text ceiling any surface is known to accept.
pub const MAX_STATUS_TEXT_LIMIT: usize = 127;

/// Shortest tick we accept, in milliseconds.
pub const MIN_TICK_MS: u64 = 50;

impl TryFrom<RawRelayConfig> for RelayConfig {
    type Error = RelayError;

    fn try_from(raw: RawRelayConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(RelayConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(raw: &RawRelayConfig) -> Result<()> {
    ensure_primary(raw)?;
    validate_tick(raw)?;
    validate_status_text_limit(raw)?;
    Ok(())
}

fn ensure_primary(raw: &RawRelayConfig) -> Result<()> {
    match raw.primary.as_deref().map(str::trim) {
        Some(cmd) if !cmd.is_empty() => Ok(()),
        _ => Err(RelayError::ConfigError(
            "a primary command is required (--primary or [relay].primary)".to_string(),
        )),
    }
}

fn validate_tick(raw: &RawRelayConfig) -> Result<()> {
    if let Some(ms) = raw.tick_ms {
        if ms < MIN_TICK_MS {
            return Err(RelayError::ConfigError(format!(
                "tick_ms must be >= {MIN_TICK_MS} (got {ms})"
            )));
        }
    }
    Ok(())
}

fn validate_status_text_limit(raw: &RawRelayConfig) -> Result<()> {
    if let Some(limit) = raw.status_text_limit {
        if !(MIN_STATUS_TEXT_LIMIT..=MAX_STATUS_TEXT_LIMIT).contains(&limit) {
            return Err(RelayError::ConfigError(format!(
                "status_text_limit must be between {MIN_STATUS_TEXT_LIMIT} and {MAX_STATUS_TEXT_LIMIT} (got {limit})"
            )));
        }
    }
    Ok(())
}
