// src/exec/unix.rs

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{ExitNotice, ProcessHandle, ProcessLauncher};
use crate::command::CommandSpec;
use crate::errors::{RelayError, Result};

/// Spawns the resolved executable directly. The argument string is split
/// into words with POSIX quoting rules, but nothing in it is interpreted:
/// `&`, `;` or `$(...)` reach the target as plain arguments, so the process
/// we watch is always the target itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnLauncher;

impl ProcessLauncher for SpawnLauncher {
    fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ProcessHandle>> {
        let exe = resolve_executable(spec.executable())?;
        let args = split_arguments(spec)?;

        let mut cmd = Command::new(&exe);
        cmd.args(&args).stdin(Stdio::null());

        let mut child = cmd.spawn().map_err(|e| RelayError::launch(&exe, e))?;
        let pid = child.id();
        info!(exe = %exe.display(), args = %spec.arguments, ?pid, "process started");

        let exited = Arc::new(AtomicBool::new(false));
        let (exit_tx, exit_rx) = oneshot::channel();

        let waiter = {
            let exited = Arc::clone(&exited);
            tokio::spawn(async move {
                let code = match child.wait().await {
                    Ok(status) => status.code(),
                    Err(e) => {
                        warn!(?pid, error = %e, "waiting for process failed");
                        None
                    }
                };
                exited.store(true, Ordering::SeqCst);
                debug!(?pid, ?code, "process exited");
                let _ = exit_tx.send(code);
            })
        };

        Ok(Box::new(ChildHandle {
            pid,
            exited,
            notice: Some(exit_rx),
            waiter,
        }))
    }
}

#[derive(Debug)]
struct ChildHandle {
    pid: Option<u32>,
    exited: Arc<AtomicBool>,
    notice: Option<ExitNotice>,
    waiter: JoinHandle<()>,
}

impl ProcessHandle for ChildHandle {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    fn take_exit_notice(&mut self) -> Option<ExitNotice> {
        self.notice.take()
    }

    fn release(self: Box<Self>) {
        // The child itself keeps running; only our wait is abandoned.
        self.waiter.abort();
        debug!(pid = ?self.pid, "process handle released");
    }
}

/// Split the argument string into words. Unbalanced quotes fail the launch
/// rather than guessing where an argument ends.
pub fn split_arguments(spec: &CommandSpec) -> Result<Vec<String>> {
    shell_words::split(&spec.arguments)
        .map_err(|e| RelayError::launch(&spec.executable_path, format!("bad arguments: {e}")))
}

/// Locate the executable the way a shell would: paths containing a
/// separator are taken as-is, bare names are looked up on `PATH`.
pub fn resolve_executable(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(RelayError::launch(path, "empty executable path"));
    }

    if path.components().count() > 1 || path.is_absolute() {
        return if is_executable(path) {
            Ok(path.to_path_buf())
        } else {
            Err(RelayError::launch(path, "not found or not executable"))
        };
    }

    std::env::var_os("PATH")
        .iter()
        .flat_map(std::env::split_paths)
        .map(|dir| dir.join(path))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| RelayError::launch(path, "not found on PATH"))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
