// src/engine/mod.rs

//! Relay engine: decides when the primary process is done and hands off to
//! the follow-up.
//!
//! Two asynchronous sources feed the engine and are not ordered with respect
//! to each other:
//! - the primary's exit notification,
//! - the periodic tick (status refresh, and window polling in windowed
//!   mode).
//!
//! Both, plus user actions and Ctrl-C, arrive as [`RelayEvent`]s on one
//! channel drained by a single consumer. The pure state machine lives in
//! [`core`]; the async/IO shell is implemented in [`runtime`].

use std::time::Instant;

use crate::status::StatusAction;

/// Events flowing into the runtime from the exit watcher, ticker, status
/// surface and signal handler.
#[derive(Debug, Clone)]
pub enum RelayEvent {
    /// The primary process exited.
    PrimaryExited { code: Option<i32> },
    /// Periodic tick: refresh status text, poll windows.
    Tick,
    /// The user picked an action on the status surface.
    ActionInvoked(StatusAction),
    /// Ctrl-C or similar.
    ShutdownRequested,
}

/// Lifecycle of one relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    Idle,
    Launching,
    Monitoring,
    Completing,
    Terminated,
}

/// Why the relay completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    /// The primary process exited (exit code if known).
    PrimaryExited { code: Option<i32> },
    /// Windowed mode: the primary's windows appeared and have all gone.
    WindowsClosed,
    /// The primary could not be started.
    LaunchFailed,
    /// The user asked to stop (status action or Ctrl-C).
    UserExit,
}

impl CompletionCause {
    /// Only a primary that actually finished is followed up.
    pub fn launches_followup(self) -> bool {
        matches!(
            self,
            CompletionCause::PrimaryExited { .. } | CompletionCause::WindowsClosed
        )
    }
}

/// What the IO shell observed on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollObservation {
    pub now: Instant,
    /// Liveness re-check of the primary.
    pub primary_exited: bool,
    /// Visible window count, or `None` when the census was not queried or
    /// failed.
    pub visible_windows: Option<usize>,
}

/// Inputs to the pure core, as prepared by the IO shell.
#[derive(Debug, Clone)]
pub enum CoreInput {
    Launched { pid: Option<u32>, at: Instant },
    LaunchFailed { message: String },
    PrimaryExited { code: Option<i32> },
    Polled(PollObservation),
    Action(StatusAction),
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod window_watch;

pub use self::core::RelayCore;
pub use event_handlers::{RelayCommand, RelayStep};
pub use runtime::{Collaborators, RelayOutcome, Runtime, RuntimeOptions};
pub use window_watch::WindowWatch;
