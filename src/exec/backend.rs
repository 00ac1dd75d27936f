// src/exec/backend.rs

//! Pluggable launcher abstraction.
//!
//! The runtime talks to a `ProcessLauncher` instead of spawning processes
//! itself. Production code uses the platform launcher from
//! [`platform_launcher`](super::platform_launcher); tests provide their own
//! implementation that records launches and lets the test decide when a
//! process "exits".

use std::fmt::Debug;

use tokio::sync::oneshot;

use crate::command::CommandSpec;
use crate::errors::Result;

/// One-shot exit notification carrying the exit code, if the OS reported
/// one. Delivered asynchronously, from whatever context observed the exit.
pub type ExitNotice = oneshot::Receiver<Option<i32>>;

/// Starts external processes with shell-level semantics.
pub trait ProcessLauncher: Send + Sync + Debug {
    /// Start `spec`. Fails when the target does not exist or the OS refuses
    /// to start it; the caller decides whether that is fatal.
    fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ProcessHandle>>;
}

/// A launched process.
///
/// Dropping or releasing a handle never kills the process: once the relay is
/// done with a process, the process is on its own.
pub trait ProcessHandle: Send + Debug {
    /// OS process id, when the launch produced a trackable process.
    fn pid(&self) -> Option<u32>;

    /// Non-blocking liveness check.
    fn has_exited(&self) -> bool;

    /// Subscribe to the exit notification. Only the first call returns
    /// `Some`.
    fn take_exit_notice(&mut self) -> Option<ExitNotice>;

    /// Stop tracking the process and free the OS handle.
    fn release(self: Box<Self>);
}
