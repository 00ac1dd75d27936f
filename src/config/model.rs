// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Title used by the status surface when none is configured.
pub const DEFAULT_STATUS_TITLE: &str = "AppRelay";

/// Default status refresh / window poll period.
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Default ceiling for the status text, in characters. Matches the longest
/// tooltip the Windows notification area accepts.
pub const DEFAULT_STATUS_TEXT_LIMIT: usize = 127;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [relay]
/// primary = '"C:\Program Files\Game\launcher.exe" -silent'
/// followup = 'C:\tools\backup.exe'
/// icon = 'C:\tools\game.ico'
/// title = "Game session"
/// windowed = true
/// tick_ms = 1000
/// ```
///
/// Every key is optional in the file; the primary command may come from the
/// command line instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub relay: RawRelayConfig,
}

/// `[relay]` section, also used as the merge target for CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRelayConfig {
    pub primary: Option<String>,
    pub followup: Option<String>,
    pub icon: Option<PathBuf>,
    pub title: Option<String>,
    #[serde(default)]
    pub windowed: bool,
    pub tick_ms: Option<u64>,
    pub status_text_limit: Option<usize>,
}

/// Validated, read-only relay configuration.
///
/// Construct through `RelayConfig::try_from(RawRelayConfig)` so the invariants
/// (non-blank primary command, sane tick and text limits) always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub primary_command: String,
    pub followup_command: Option<String>,
    pub icon_path: Option<PathBuf>,
    pub status_title: Option<String>,
    pub windowed_mode: bool,
    pub tick_interval: Duration,
    pub status_text_limit: usize,
}

impl RelayConfig {
    pub(crate) fn new_unchecked(raw: RawRelayConfig) -> Self {
        Self {
            primary_command: raw.primary.unwrap_or_default().trim().to_string(),
            followup_command: non_blank(raw.followup),
            icon_path: raw.icon.filter(|p| !p.as_os_str().is_empty()),
            status_title: non_blank(raw.title),
            windowed_mode: raw.windowed,
            tick_interval: Duration::from_millis(raw.tick_ms.unwrap_or(DEFAULT_TICK_MS)),
            status_text_limit: raw.status_text_limit.unwrap_or(DEFAULT_STATUS_TEXT_LIMIT),
        }
    }

    /// Configured title, or the default one.
    pub fn title(&self) -> &str {
        self.status_title.as_deref().unwrap_or(DEFAULT_STATUS_TITLE)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
