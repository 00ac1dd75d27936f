#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::mpsc;

use apprelay::config::RelayConfig;
use apprelay::engine::{Collaborators, RelayCore, RelayEvent, Runtime, RuntimeOptions};
use apprelay::fs::mock::MockFileSystem;

use crate::fakes::{FakeLauncher, RecordingIconBackend, RecordingSurface, ScriptedCensus};

/// Where the mock filesystem pretends the relay binary lives.
pub const FAKE_PROGRAM_PATH: &str = "/opt/apprelay/bin/apprelay";

/// A runtime wired to fakes, plus handles for driving and inspecting it.
///
/// The ticker is not spawned; tests send `RelayEvent::Tick` through `tx`
/// themselves so every poll is deterministic.
pub struct RelayHarness {
    pub runtime: Runtime,
    pub tx: mpsc::Sender<RelayEvent>,
    pub launcher: FakeLauncher,
    pub census: ScriptedCensus,
    pub surface: RecordingSurface,
    pub icons: RecordingIconBackend,
    pub fs: MockFileSystem,
}

pub fn harness(config: RelayConfig, launcher: FakeLauncher, census: ScriptedCensus) -> RelayHarness {
    let fs = MockFileSystem::new();
    fs.add_file(FAKE_PROGRAM_PATH, b"\x7fELF".to_vec());
    fs.set_current_exe(FAKE_PROGRAM_PATH);

    let surface = RecordingSurface::new();
    let icons = RecordingIconBackend::new(Arc::new(fs.clone()));

    let (tx, rx) = mpsc::channel::<RelayEvent>(64);

    let collaborators = Collaborators {
        launcher: Box::new(launcher.clone()),
        census: Box::new(census.clone()),
        icons: Arc::new(icons.clone()),
        fs: Arc::new(fs.clone()),
        surface: Box::new(surface.clone()),
    };

    let runtime = Runtime::new(
        RelayCore::new(config),
        collaborators,
        tx.clone(),
        rx,
        RuntimeOptions { spawn_ticker: false },
    );

    RelayHarness {
        runtime,
        tx,
        launcher,
        census,
        surface,
        icons,
        fs,
    }
}
