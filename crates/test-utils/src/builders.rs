#![allow(dead_code)]

use std::path::PathBuf;

use apprelay::config::{RawRelayConfig, RelayConfig};

/// Builder for `RelayConfig` to simplify test setup.
pub struct RelayConfigBuilder {
    raw: RawRelayConfig,
}

impl RelayConfigBuilder {
    pub fn new(primary: &str) -> Self {
        Self {
            raw: RawRelayConfig {
                primary: Some(primary.to_string()),
                ..RawRelayConfig::default()
            },
        }
    }

    pub fn followup(mut self, cmd: &str) -> Self {
        self.raw.followup = Some(cmd.to_string());
        self
    }

    pub fn icon(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw.icon = Some(path.into());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.raw.title = Some(title.to_string());
        self
    }

    pub fn windowed(mut self, val: bool) -> Self {
        self.raw.windowed = val;
        self
    }

    pub fn tick_ms(mut self, ms: u64) -> Self {
        self.raw.tick_ms = Some(ms);
        self
    }

    pub fn status_text_limit(mut self, limit: usize) -> Self {
        self.raw.status_text_limit = Some(limit);
        self
    }

    pub fn raw(self) -> RawRelayConfig {
        self.raw
    }

    pub fn build(self) -> RelayConfig {
        RelayConfig::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}
