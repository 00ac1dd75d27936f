// src/census/mod.rs

//! Window census: which visible top-level windows does a process own right
//! now?
//!
//! The census is a point-in-time, read-only query. Nothing is cached; the
//! relay monitor asks again on every tick.
//!
//! - [`win32`] enumerates windows with `EnumWindows` (Windows only).
//! - [`UnsupportedCensus`] is used everywhere else. Every query fails, which
//!   the monitor treats as "no new information", so windowed mode degrades
//!   to exit watching.

use std::fmt::Debug;

use crate::errors::{RelayError, Result};

#[cfg(windows)]
pub mod win32;

/// Title reported for a visible window whose title is empty. Such windows
/// are still counted and listed.
pub const UNTITLED_WINDOW: &str = "(untitled)";

/// One visible top-level window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub title: String,
}

impl WindowInfo {
    /// Build from a raw title, substituting the placeholder for empty ones.
    pub fn from_title(title: impl Into<String>) -> Self {
        let title = title.into();
        if title.is_empty() {
            Self {
                title: UNTITLED_WINDOW.to_string(),
            }
        } else {
            Self { title }
        }
    }
}

/// Query interface over the OS window list.
///
/// Both methods must apply the same predicate (owned by `pid` AND visible),
/// so that `list_visible_windows(pid)?.len() == count_visible_windows(pid)?`
/// whenever the window state does not change between the two calls.
pub trait WindowCensus: Send + Sync + Debug {
    fn list_visible_windows(&self, pid: u32) -> Result<Vec<WindowInfo>>;

    /// Same answer as `list_visible_windows(pid)?.len()` without collecting
    /// titles.
    fn count_visible_windows(&self, pid: u32) -> Result<usize> {
        self.list_visible_windows(pid).map(|windows| windows.len())
    }
}

/// Census for platforms without a window enumeration backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedCensus;

impl WindowCensus for UnsupportedCensus {
    fn list_visible_windows(&self, _pid: u32) -> Result<Vec<WindowInfo>> {
        Err(RelayError::CensusUnavailable)
    }

    fn count_visible_windows(&self, _pid: u32) -> Result<usize> {
        Err(RelayError::CensusUnavailable)
    }
}

/// Whether this build has a real census backend.
pub fn census_supported() -> bool {
    cfg!(windows)
}

/// The census backend for the current platform.
pub fn platform_census() -> Box<dyn WindowCensus> {
    #[cfg(windows)]
    {
        Box::new(win32::Win32WindowCensus)
    }
    #[cfg(not(windows))]
    {
        Box::new(UnsupportedCensus)
    }
}
