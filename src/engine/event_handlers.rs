// src/engine/event_handlers.rs

//! Event handling logic for the core relay state machine.

use tracing::{debug, info};

use crate::command::CommandSpec;
use crate::engine::window_watch::WindowWatch;
use crate::engine::{CompletionCause, PollObservation};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCommand {
    /// Push new (already truncated) text to the status surface.
    RefreshStatus(String),
    /// Show the primary's visible windows on the status surface.
    ShowDetails,
    /// User-visible error notification.
    ReportError { title: String, message: String },
    /// Start the follow-up process.
    LaunchFollowup(CommandSpec),
    /// Release ticker, surface, icon and primary handle.
    Teardown(CompletionCause),
}

/// Decision returned by the core after handling a single input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<RelayCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl RelayStep {
    pub fn proceed(commands: Vec<RelayCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn stop(commands: Vec<RelayCommand>) -> Self {
        Self {
            commands,
            keep_running: false,
        }
    }

    /// True if this step starts the follow-up.
    pub fn launches_followup(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, RelayCommand::LaunchFollowup(_)))
    }

    /// True if this step tears the relay down.
    pub fn tears_down(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, RelayCommand::Teardown(_)))
    }
}

/// Outcome of evaluating one tick in windowed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollVerdict {
    /// Nothing decided; keep monitoring.
    Continue,
    /// Complete with this cause.
    Complete(CompletionCause),
}

/// Evaluate a tick observation in windowed mode.
///
/// Liveness comes first: an exited primary is the process-exit trigger seen
/// early. Otherwise the census count drives the [`WindowWatch`]. A failed
/// census (`None`) carries no information.
pub fn handle_windowed_poll(watch: &mut WindowWatch, observation: &PollObservation) -> PollVerdict {
    if observation.primary_exited {
        debug!("primary found exited during poll");
        return PollVerdict::Complete(CompletionCause::PrimaryExited { code: None });
    }

    let Some(visible) = observation.visible_windows else {
        return PollVerdict::Continue;
    };

    let appeared_before = watch.window_has_appeared();
    if watch.observe(visible) {
        info!("all primary windows closed");
        return PollVerdict::Complete(CompletionCause::WindowsClosed);
    }
    if !appeared_before && watch.window_has_appeared() {
        info!(visible, "primary window appeared");
    }

    PollVerdict::Continue
}

/// Commands for the single completion transition: follow-up first (if the
/// cause warrants one and one is configured), then teardown.
pub fn completion_commands(
    cause: CompletionCause,
    followup: Option<&CommandSpec>,
) -> Vec<RelayCommand> {
    let mut commands = Vec::with_capacity(2);

    match followup {
        Some(spec) if cause.launches_followup() => {
            commands.push(RelayCommand::LaunchFollowup(spec.clone()));
        }
        Some(_) => {
            info!(?cause, "skipping follow-up launch");
        }
        None => {}
    }

    commands.push(RelayCommand::Teardown(cause));
    commands
}
