// src/config/mod.rs

//! Relay configuration: the TOML/CLI-facing raw model, loading, and the
//! validated [`RelayConfig`] the runtime consumes.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{RawConfigFile, RawRelayConfig, RelayConfig};
