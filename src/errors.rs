// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to launch {path:?}: {reason}")]
    Launch { path: PathBuf, reason: String },

    #[error("Window enumeration is not available on this platform")]
    CensusUnavailable,

    #[error("Window census failed: {0}")]
    Census(String),

    #[error("Icon unavailable from {path:?}: {reason}")]
    Icon { path: PathBuf, reason: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    pub fn launch(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RelayError::Launch {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn icon(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RelayError::Icon {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RelayError>;
