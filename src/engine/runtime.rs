// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::census::WindowCensus;
use crate::command::CommandSpec;
use crate::errors::Result;
use crate::exec::{ProcessHandle, ProcessLauncher};
use crate::fs::FileSystem;
use crate::icon::{Icon, IconBackend, IconResolver};
use crate::status::{StatusAction, StatusSurface};

use super::core::RelayCore;
use super::{CompletionCause, CoreInput, PollObservation, RelayCommand, RelayEvent, RelayStep};

/// The external collaborators the runtime drives.
pub struct Collaborators {
    pub launcher: Box<dyn ProcessLauncher>,
    pub census: Box<dyn WindowCensus>,
    pub icons: Arc<dyn IconBackend>,
    pub fs: Arc<dyn FileSystem>,
    pub surface: Box<dyn StatusSurface>,
}

/// Runtime switches, mostly for tests that drive ticks by hand.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Spawn the periodic ticker after the primary launches.
    pub spawn_ticker: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self { spawn_ticker: true }
    }
}

/// How a relay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOutcome {
    pub cause: CompletionCause,
    pub followup_launched: bool,
}

/// Drives `RelayCore` in response to `RelayEvent`s and performs the IO the
/// core asks for.
///
/// This is a pure IO shell around `RelayCore`, which contains all the relay
/// semantics. Everything owned here (ticker, surface, icon, primary handle)
/// is released by the single teardown the core requests.
pub struct Runtime {
    core: RelayCore,
    event_tx: mpsc::Sender<RelayEvent>,
    event_rx: mpsc::Receiver<RelayEvent>,
    launcher: Box<dyn ProcessLauncher>,
    census: Box<dyn WindowCensus>,
    icons: Arc<dyn IconBackend>,
    fs: Arc<dyn FileSystem>,
    surface: Box<dyn StatusSurface>,
    options: RuntimeOptions,
    icon: Option<Icon>,
    primary: Option<Box<dyn ProcessHandle>>,
    ticker: Option<JoinHandle<()>>,
    followup_launched: bool,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// `event_tx` must feed `event_rx`; the runtime uses it for the ticker
    /// and the exit watcher.
    pub fn new(
        core: RelayCore,
        collaborators: Collaborators,
        event_tx: mpsc::Sender<RelayEvent>,
        event_rx: mpsc::Receiver<RelayEvent>,
        options: RuntimeOptions,
    ) -> Self {
        let Collaborators {
            launcher,
            census,
            icons,
            fs,
            surface,
        } = collaborators;
        Self {
            core,
            event_tx,
            event_rx,
            launcher,
            census,
            icons,
            fs,
            surface,
            options,
            icon: None,
            primary: None,
            ticker: None,
            followup_launched: false,
        }
    }

    /// Show the status surface, launch the primary, then run the event loop
    /// until the core completes the relay. Teardown has happened by the time
    /// this returns.
    pub async fn run(mut self) -> Result<RelayOutcome> {
        info!("relay runtime started");

        self.show_surface();

        let step = self.launch_primary();
        let mut keep_running = self.execute_step(step);

        if keep_running && self.options.spawn_ticker {
            self.ticker = Some(spawn_ticker(
                self.core.config().tick_interval,
                self.event_tx.clone(),
            ));
        }

        while keep_running {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("relay event channel closed; exiting");
                    RelayEvent::ShutdownRequested
                }
            };

            debug!(?event, "runtime received event");

            let input = self.prepare_input(event);
            let step = self.core.step(input);
            keep_running = self.execute_step(step);
        }

        let cause = self
            .core
            .completion_cause()
            .unwrap_or(CompletionCause::UserExit);
        info!(?cause, followup_launched = self.followup_launched, "runtime exiting");

        Ok(RelayOutcome {
            cause,
            followup_launched: self.followup_launched,
        })
    }

    fn show_surface(&mut self) {
        let config = self.core.config();
        let icon = IconResolver::new(self.icons.as_ref(), self.fs.as_ref())
            .resolve(config.icon_path.as_deref(), &config.primary_command);

        self.surface.register_action(StatusAction::ShowDetails);
        self.surface.register_action(StatusAction::Exit);
        self.surface
            .show(&icon, &self.core.status_text(Instant::now()));
        self.icon = Some(icon);
    }

    fn launch_primary(&mut self) -> RelayStep {
        let Some(spec) = self.core.begin_launch() else {
            return RelayStep::proceed(Vec::new());
        };

        info!(exe = %spec.executable_path, args = %spec.arguments, "launching primary");

        match self.launcher.launch(&spec) {
            Ok(mut handle) => {
                let pid = handle.pid();
                if let Some(notice) = handle.take_exit_notice() {
                    let tx = self.event_tx.clone();
                    tokio::spawn(async move {
                        // A dropped sender means the handle was released: no
                        // exit to report.
                        if let Ok(code) = notice.await {
                            let _ = tx.send(RelayEvent::PrimaryExited { code }).await;
                        }
                    });
                }
                self.primary = Some(handle);
                self.core.step(CoreInput::Launched {
                    pid,
                    at: Instant::now(),
                })
            }
            Err(err) => {
                warn!(error = %err, "primary launch failed");
                self.core.step(CoreInput::LaunchFailed {
                    message: err.to_string(),
                })
            }
        }
    }

    fn prepare_input(&self, event: RelayEvent) -> CoreInput {
        match event {
            RelayEvent::PrimaryExited { code } => CoreInput::PrimaryExited { code },
            RelayEvent::Tick => CoreInput::Polled(self.observe()),
            RelayEvent::ActionInvoked(action) => CoreInput::Action(action),
            RelayEvent::ShutdownRequested => CoreInput::ShutdownRequested,
        }
    }

    /// Liveness first, then (windowed mode, primary alive) the census.
    /// Census errors are swallowed: no information this tick.
    fn observe(&self) -> PollObservation {
        let now = Instant::now();
        let primary_exited = self.primary.as_ref().is_none_or(|p| p.has_exited());

        let visible_windows = match self.core.primary_pid() {
            Some(pid) if self.core.config().windowed_mode && !primary_exited => {
                match self.census.count_visible_windows(pid) {
                    Ok(count) => Some(count),
                    Err(err) => {
                        debug!(pid, error = %err, "window census failed; ignoring this tick");
                        None
                    }
                }
            }
            _ => None,
        };

        PollObservation {
            now,
            primary_exited,
            visible_windows,
        }
    }

    /// Execute the commands of one step; returns `keep_running`.
    fn execute_step(&mut self, step: RelayStep) -> bool {
        for command in step.commands {
            self.execute_command(command);
        }
        step.keep_running
    }

    fn execute_command(&mut self, command: RelayCommand) {
        match command {
            RelayCommand::RefreshStatus(text) => self.surface.set_text(&text),
            RelayCommand::ShowDetails => self.show_details(),
            RelayCommand::ReportError { title, message } => {
                self.surface.notify_error(&title, &message);
            }
            RelayCommand::LaunchFollowup(spec) => self.launch_followup(&spec),
            RelayCommand::Teardown(cause) => self.teardown(cause),
        }
    }

    fn show_details(&mut self) {
        let now = Instant::now();
        let title = format!(
            "{} ({})",
            self.core.config().title(),
            crate::status::text::format_elapsed(self.core.elapsed(now))
        );

        let lines = match self.core.primary_pid() {
            Some(pid) => match self.census.list_visible_windows(pid) {
                Ok(windows) if windows.is_empty() => vec!["no visible windows".to_string()],
                Ok(windows) => windows.into_iter().map(|w| w.title).collect(),
                Err(err) => vec![format!("window list unavailable: {err}")],
            },
            None => vec!["primary process id unknown".to_string()],
        };

        self.surface.show_details(&title, &lines);
    }

    fn launch_followup(&mut self, spec: &CommandSpec) {
        info!(exe = %spec.executable_path, args = %spec.arguments, "launching follow-up");
        match self.launcher.launch(spec) {
            Ok(handle) => {
                self.followup_launched = true;
                // The follow-up is not watched.
                handle.release();
            }
            Err(err) => {
                warn!(error = %err, "follow-up launch failed");
                let title = format!("{}: could not start follow-up", self.core.config().title());
                self.surface.notify_error(&title, &err.to_string());
            }
        }
    }

    /// Release everything this runtime owns. Every step tolerates its
    /// resource already being gone.
    fn teardown(&mut self, cause: CompletionCause) {
        debug!(?cause, "tearing down");

        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        self.surface.hide();
        self.surface.dispose();

        if let Some(icon) = self.icon.take() {
            icon.release(self.icons.as_ref());
        }

        if let Some(primary) = self.primary.take() {
            primary.release();
        }

        self.core.mark_terminated();
        info!(?cause, "teardown complete");
    }
}

/// Periodic tick source. The first tick fires one period after start.
fn spawn_ticker(period: Duration, tx: mpsc::Sender<RelayEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if tx.send(RelayEvent::Tick).await.is_err() {
                debug!("ticker stopping: runtime gone");
                break;
            }
        }
    })
}
