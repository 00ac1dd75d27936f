// src/engine/core.rs

//! Pure core relay state machine.
//!
//! `RelayCore` consumes [`CoreInput`]s and produces:
//! - an updated core state
//! - a list of [`RelayCommand`]s describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for:
//! - launching processes and watching their exit
//! - running the ticker and querying the window census
//! - driving the status surface and releasing resources
//!
//! The `is_exiting` guard lives here. Because a single consumer feeds the
//! core, checking and setting it cannot interleave; whichever trigger reaches
//! the core first completes the relay and every later trigger is a no-op.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::command::CommandSpec;
use crate::config::RelayConfig;
use crate::engine::event_handlers::{
    completion_commands, handle_windowed_poll, PollVerdict, RelayCommand, RelayStep,
};
use crate::engine::window_watch::WindowWatch;
use crate::engine::{CompletionCause, CoreInput, PollObservation, RelayPhase};
use crate::status::StatusAction;
use crate::status::text::{compose_status_text, StatusDetail};

/// Pure core relay state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct RelayCore {
    config: RelayConfig,
    primary: CommandSpec,
    followup: Option<CommandSpec>,
    phase: RelayPhase,
    primary_pid: Option<u32>,
    started_at: Option<Instant>,
    window_watch: WindowWatch,
    last_visible: Option<usize>,
    is_exiting: bool,
    cause: Option<CompletionCause>,
}

impl RelayCore {
    pub fn new(config: RelayConfig) -> Self {
        let primary = CommandSpec::parse(&config.primary_command);
        let followup = config.followup_command.as_deref().map(CommandSpec::parse);
        Self {
            config,
            primary,
            followup,
            phase: RelayPhase::Idle,
            primary_pid: None,
            started_at: None,
            window_watch: WindowWatch::default(),
            last_visible: None,
            is_exiting: false,
            cause: None,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn phase(&self) -> RelayPhase {
        self.phase
    }

    pub fn primary(&self) -> &CommandSpec {
        &self.primary
    }

    pub fn followup(&self) -> Option<&CommandSpec> {
        self.followup.as_ref()
    }

    pub fn primary_pid(&self) -> Option<u32> {
        self.primary_pid
    }

    pub fn window_watch(&self) -> WindowWatch {
        self.window_watch
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn completion_cause(&self) -> Option<CompletionCause> {
        self.cause
    }

    /// `Idle → Launching`. Returns the primary command to launch, or `None`
    /// if a launch was already attempted: one primary per relay.
    pub fn begin_launch(&mut self) -> Option<CommandSpec> {
        if self.phase != RelayPhase::Idle {
            warn!(phase = ?self.phase, "primary launch already attempted");
            return None;
        }
        self.phase = RelayPhase::Launching;
        Some(self.primary.clone())
    }

    /// `Completing → Terminated`, once the shell has finished teardown.
    pub fn mark_terminated(&mut self) {
        if self.phase == RelayPhase::Completing {
            self.phase = RelayPhase::Terminated;
        }
    }

    /// Wall-clock time since the primary was launched.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Current status text, already truncated to the configured limit.
    pub fn status_text(&self, now: Instant) -> String {
        let detail = if self.config.windowed_mode {
            StatusDetail::Windows(self.last_visible)
        } else {
            StatusDetail::Targets {
                primary: self.primary.file_name(),
                followup: self.followup.as_ref().map(CommandSpec::file_name),
            }
        };
        compose_status_text(
            self.config.title(),
            detail,
            self.elapsed(now),
            self.config.status_text_limit,
        )
    }

    /// Handle a single input, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, input: CoreInput) -> RelayStep {
        if self.is_exiting {
            debug!(?input, "relay already completing; input ignored");
            return RelayStep::stop(Vec::new());
        }

        match input {
            CoreInput::Launched { pid, at } => self.on_launched(pid, at),
            CoreInput::LaunchFailed { message } => self.on_launch_failed(message),
            CoreInput::PrimaryExited { code } if self.phase == RelayPhase::Idle => {
                warn!(?code, "exit reported before any launch; ignored");
                RelayStep::proceed(Vec::new())
            }
            CoreInput::PrimaryExited { code } => {
                info!(?code, "primary process exited");
                self.complete(CompletionCause::PrimaryExited { code })
            }
            CoreInput::Polled(observation) => self.on_poll(observation),
            CoreInput::Action(StatusAction::ShowDetails) => {
                RelayStep::proceed(vec![RelayCommand::ShowDetails])
            }
            CoreInput::Action(StatusAction::Exit) | CoreInput::ShutdownRequested => {
                info!("exit requested by user");
                self.complete(CompletionCause::UserExit)
            }
        }
    }

    fn on_launched(&mut self, pid: Option<u32>, at: Instant) -> RelayStep {
        if self.phase != RelayPhase::Launching {
            warn!(phase = ?self.phase, "launch report outside of Launching; ignored");
            return RelayStep::proceed(Vec::new());
        }
        self.phase = RelayPhase::Monitoring;
        self.primary_pid = pid;
        self.started_at = Some(at);
        info!(?pid, windowed = self.config.windowed_mode, "monitoring primary");
        RelayStep::proceed(vec![RelayCommand::RefreshStatus(self.status_text(at))])
    }

    fn on_launch_failed(&mut self, message: String) -> RelayStep {
        let mut commands = vec![RelayCommand::ReportError {
            title: format!("{}: could not start", self.config.title()),
            message,
        }];
        let mut step = self.complete(CompletionCause::LaunchFailed);
        commands.append(&mut step.commands);
        RelayStep::stop(commands)
    }

    fn on_poll(&mut self, observation: PollObservation) -> RelayStep {
        if self.phase != RelayPhase::Monitoring {
            return RelayStep::proceed(Vec::new());
        }

        if self.config.windowed_mode {
            if let Some(visible) = observation.visible_windows {
                self.last_visible = Some(visible);
            }
            if let PollVerdict::Complete(cause) =
                handle_windowed_poll(&mut self.window_watch, &observation)
            {
                return self.complete(cause);
            }
        }

        RelayStep::proceed(vec![RelayCommand::RefreshStatus(
            self.status_text(observation.now),
        )])
    }

    /// The single `→ Completing` transition.
    fn complete(&mut self, cause: CompletionCause) -> RelayStep {
        if self.is_exiting {
            return RelayStep::stop(Vec::new());
        }
        self.is_exiting = true;
        self.phase = RelayPhase::Completing;
        self.cause = Some(cause);
        info!(?cause, "relay completing");

        RelayStep::stop(completion_commands(cause, self.followup.as_ref()))
    }
}
