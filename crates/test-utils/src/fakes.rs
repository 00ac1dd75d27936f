#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use apprelay::census::{WindowCensus, WindowInfo};
use apprelay::command::CommandSpec;
use apprelay::errors::{RelayError, Result};
use apprelay::exec::{ExitNotice, ProcessHandle, ProcessLauncher};
use apprelay::fs::FileSystem;
use apprelay::icon::{FileIconBackend, Icon, IconBackend, IconHandle, IconOrigin};
use apprelay::status::{StatusAction, StatusSurface};

// ---------------------------------------------------------------------------
// Launcher
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct LauncherState {
    attempts: Vec<CommandSpec>,
    missing: HashSet<String>,
    processes: Vec<FakeProcessControl>,
    next_pid: u32,
}

/// A fake launcher that:
/// - records every launch attempt
/// - fails for executables registered as missing
/// - hands out processes whose exit the test triggers via
///   [`FakeProcessControl`].
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    state: Arc<Mutex<LauncherState>>,
    released: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches of `path` fail as if the file did not exist.
    pub fn with_missing(self, path: &str) -> Self {
        self.state.lock().unwrap().missing.insert(path.to_string());
        self
    }

    pub fn attempts(&self) -> Vec<CommandSpec> {
        self.state.lock().unwrap().attempts.clone()
    }

    pub fn attempts_of(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .attempts
            .iter()
            .filter(|spec| spec.executable_path == path)
            .count()
    }

    /// Control for the `index`-th successfully started process.
    pub fn process(&self, index: usize) -> Option<FakeProcessControl> {
        self.state.lock().unwrap().processes.get(index).cloned()
    }

    /// Number of handles released back by the runtime.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ProcessHandle>> {
        let mut state = self.state.lock().unwrap();
        state.attempts.push(spec.clone());

        if state.missing.contains(&spec.executable_path) {
            return Err(RelayError::launch(&spec.executable_path, "file not found"));
        }

        state.next_pid += 1;
        let pid = 1000 + state.next_pid;
        let exited = Arc::new(AtomicBool::new(false));
        let (exit_tx, exit_rx) = oneshot::channel();

        state.processes.push(FakeProcessControl {
            pid,
            spec: spec.clone(),
            exited: Arc::clone(&exited),
            exit_tx: Arc::new(Mutex::new(Some(exit_tx))),
        });

        Ok(Box::new(FakeProcess {
            pid,
            exited,
            notice: Some(exit_rx),
            released: Arc::clone(&self.released),
        }))
    }
}

#[derive(Debug)]
struct FakeProcess {
    pid: u32,
    exited: Arc<AtomicBool>,
    notice: Option<ExitNotice>,
    released: Arc<AtomicUsize>,
}

impl ProcessHandle for FakeProcess {
    fn pid(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    fn take_exit_notice(&mut self) -> Option<ExitNotice> {
        self.notice.take()
    }

    fn release(self: Box<Self>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test-side control over a fake process.
#[derive(Debug, Clone)]
pub struct FakeProcessControl {
    pub pid: u32,
    pub spec: CommandSpec,
    exited: Arc<AtomicBool>,
    exit_tx: Arc<Mutex<Option<oneshot::Sender<Option<i32>>>>>,
}

impl FakeProcessControl {
    /// Exit and deliver the exit notification. Returns whether anybody was
    /// still listening.
    pub fn exit(&self, code: i32) -> bool {
        self.exited.store(true, Ordering::SeqCst);
        match self.exit_tx.lock().unwrap().take() {
            Some(tx) => tx.send(Some(code)).is_ok(),
            None => false,
        }
    }

    /// Exit without delivering a notification yet; only liveness checks see
    /// it.
    pub fn exit_silently(&self) {
        self.exited.store(true, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Census
// ---------------------------------------------------------------------------

/// One scripted census answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CensusReading {
    Count(usize),
    Fail,
}

/// A census that replays a script of readings, one per count query. The last
/// reading repeats once the script runs out; an empty script reads 0.
///
/// `list_visible_windows` reports the most recent reading without advancing
/// the script, naming windows `window 1`, `window 2`, ... with every third
/// window untitled.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCensus {
    script: Arc<Mutex<VecDeque<CensusReading>>>,
    current: Arc<Mutex<Option<CensusReading>>>,
    queries: Arc<AtomicUsize>,
}

impl ScriptedCensus {
    pub fn new(readings: impl IntoIterator<Item = CensusReading>) -> Self {
        Self {
            script: Arc::new(Mutex::new(readings.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn counts(counts: impl IntoIterator<Item = usize>) -> Self {
        Self::new(counts.into_iter().map(CensusReading::Count))
    }

    /// Number of count queries served.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn advance(&self) -> CensusReading {
        let mut script = self.script.lock().unwrap();
        let reading = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().copied()
        }
        .unwrap_or(CensusReading::Count(0));
        *self.current.lock().unwrap() = Some(reading);
        reading
    }

    fn windows(count: usize) -> Vec<WindowInfo> {
        (1..=count)
            .map(|i| {
                if i % 3 == 0 {
                    WindowInfo::from_title("")
                } else {
                    WindowInfo::from_title(format!("window {i}"))
                }
            })
            .collect()
    }
}

impl WindowCensus for ScriptedCensus {
    fn list_visible_windows(&self, _pid: u32) -> Result<Vec<WindowInfo>> {
        let current = *self.current.lock().unwrap();
        match current.unwrap_or(CensusReading::Count(0)) {
            CensusReading::Count(n) => Ok(Self::windows(n)),
            CensusReading::Fail => Err(RelayError::Census("scripted failure".to_string())),
        }
    }

    fn count_visible_windows(&self, _pid: u32) -> Result<usize> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match self.advance() {
            CensusReading::Count(n) => Ok(n),
            CensusReading::Fail => Err(RelayError::Census("scripted failure".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Status surface
// ---------------------------------------------------------------------------

/// Everything a [`RecordingSurface`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    pub calls: Vec<&'static str>,
    pub icon_owned: Option<bool>,
    pub texts: Vec<String>,
    pub actions: Vec<StatusAction>,
    pub errors: Vec<(String, String)>,
    pub details: Vec<(String, Vec<String>)>,
}

impl SurfaceLog {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

/// A status surface that records every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> SurfaceLog {
        self.log.lock().unwrap().clone()
    }
}

impl StatusSurface for RecordingSurface {
    fn show(&mut self, icon: &Icon, text: &str) {
        let mut log = self.log.lock().unwrap();
        log.calls.push("show");
        log.icon_owned = Some(icon.is_owned());
        log.texts.push(text.to_string());
    }

    fn set_text(&mut self, text: &str) {
        let mut log = self.log.lock().unwrap();
        log.calls.push("set_text");
        log.texts.push(text.to_string());
    }

    fn register_action(&mut self, action: StatusAction) {
        let mut log = self.log.lock().unwrap();
        log.calls.push("register_action");
        log.actions.push(action);
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        let mut log = self.log.lock().unwrap();
        log.calls.push("notify_error");
        log.errors.push((title.to_string(), message.to_string()));
    }

    fn show_details(&mut self, title: &str, lines: &[String]) {
        let mut log = self.log.lock().unwrap();
        log.calls.push("show_details");
        log.details.push((title.to_string(), lines.to_vec()));
    }

    fn hide(&mut self) {
        self.log.lock().unwrap().calls.push("hide");
    }

    fn dispose(&mut self) {
        self.log.lock().unwrap().calls.push("dispose");
    }
}

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

/// [`FileIconBackend`] wrapper that records released icons.
#[derive(Debug, Clone)]
pub struct RecordingIconBackend {
    inner: Arc<FileIconBackend>,
    released: Arc<Mutex<Vec<IconOrigin>>>,
}

impl RecordingIconBackend {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            inner: Arc::new(FileIconBackend::new(fs)),
            released: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn released(&self) -> Vec<IconOrigin> {
        self.released.lock().unwrap().clone()
    }
}

impl IconBackend for RecordingIconBackend {
    fn load_icon_file(&self, path: &Path) -> Result<IconHandle> {
        self.inner.load_icon_file(path)
    }

    fn extract_associated(&self, path: &Path) -> Result<IconHandle> {
        self.inner.extract_associated(path)
    }

    fn release(&self, handle: IconHandle) {
        self.released.lock().unwrap().push(handle.origin().clone());
        self.inner.release(handle);
    }
}
