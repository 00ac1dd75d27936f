// src/exec/mod.rs

//! Process launching layer.
//!
//! - [`backend`] defines the [`ProcessLauncher`] / [`ProcessHandle`] traits
//!   the relay runtime talks to, so tests can swap in a fake launcher.
//! - [`unix`] spawns the target directly, after resolving the executable so
//!   a missing target is reported as a launch failure.
//! - [`shell_execute`] launches through `ShellExecuteExW` (Windows only), so
//!   shortcuts, URLs and documents open the way the shell would open them.

pub mod backend;
#[cfg(windows)]
pub mod shell_execute;
#[cfg(unix)]
pub mod unix;

pub use backend::{ExitNotice, ProcessHandle, ProcessLauncher};

/// The launcher for the current platform.
pub fn platform_launcher() -> Box<dyn ProcessLauncher> {
    #[cfg(windows)]
    {
        Box::new(shell_execute::ShellExecuteLauncher)
    }
    #[cfg(unix)]
    {
        Box::new(unix::SpawnLauncher)
    }
}
