// src/exec/shell_execute.rs

use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_FAILED, WAIT_OBJECT_0};
use windows::Win32::System::Threading::{GetExitCodeProcess, GetProcessId, WaitForSingleObject};
use windows::Win32::UI::Shell::{
    SEE_MASK_FLAG_NO_UI, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW, ShellExecuteExW,
};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
use windows::core::PCWSTR;

use super::backend::{ExitNotice, ProcessHandle, ProcessLauncher};
use crate::com::ComApartment;
use crate::command::CommandSpec;
use crate::errors::{RelayError, Result};

/// How long the waiter blocks before checking whether the handle was
/// released.
const WAIT_SLICE_MS: u32 = 250;

/// Launches through `ShellExecuteExW`, so anything the shell can open
/// (executables, shortcuts, documents, URLs) can be a relay target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecuteLauncher;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

impl ProcessLauncher for ShellExecuteLauncher {
    fn launch(&self, spec: &CommandSpec) -> Result<Box<dyn ProcessHandle>> {
        let file = wide(&spec.executable_path);
        let params = wide(&spec.arguments);

        let mut info = SHELLEXECUTEINFOW {
            cbSize: std::mem::size_of::<SHELLEXECUTEINFOW>() as u32,
            fMask: SEE_MASK_NOCLOSEPROCESS | SEE_MASK_FLAG_NO_UI,
            lpFile: PCWSTR(file.as_ptr()),
            lpParameters: if spec.has_arguments() {
                PCWSTR(params.as_ptr())
            } else {
                PCWSTR::null()
            },
            nShow: SW_SHOWNORMAL.0,
            ..Default::default()
        };

        {
            let _com = ComApartment::enter();
            unsafe { ShellExecuteExW(&mut info) }
                .map_err(|e| RelayError::launch(&spec.executable_path, e))?;
        }

        let exited = Arc::new(AtomicBool::new(false));
        let released = Arc::new(AtomicBool::new(false));
        let (exit_tx, exit_rx) = oneshot::channel();

        // Documents and URLs handed to an already-running application yield
        // no process handle: nothing to watch, so it counts as exited.
        if info.hProcess.is_invalid() {
            info!(target_path = %spec.executable_path, "shell handed target to an existing process");
            exited.store(true, Ordering::SeqCst);
            let _ = exit_tx.send(None);
            return Ok(Box::new(ShellProcess {
                pid: None,
                exited,
                released,
                notice: Some(exit_rx),
            }));
        }

        let pid = unsafe { GetProcessId(info.hProcess) };
        let pid = (pid != 0).then_some(pid);
        info!(target_path = %spec.executable_path, args = %spec.arguments, ?pid, "process started");

        let raw = info.hProcess.0 as isize;
        {
            let exited = Arc::clone(&exited);
            let released = Arc::clone(&released);
            tokio::task::spawn_blocking(move || {
                let process = HANDLE(raw as *mut c_void);
                loop {
                    let waited = unsafe { WaitForSingleObject(process, WAIT_SLICE_MS) };
                    if waited == WAIT_OBJECT_0 || waited == WAIT_FAILED {
                        let mut code = 0u32;
                        let code = unsafe { GetExitCodeProcess(process, &mut code) }
                            .ok()
                            .map(|()| code as i32);
                        if waited == WAIT_FAILED {
                            warn!(?pid, "waiting on process handle failed; treating as exited");
                        }
                        exited.store(true, Ordering::SeqCst);
                        debug!(?pid, ?code, "process exited");
                        let _ = exit_tx.send(code);
                        break;
                    }
                    if released.load(Ordering::SeqCst) {
                        break;
                    }
                }
                let _ = unsafe { CloseHandle(process) };
            });
        }

        Ok(Box::new(ShellProcess {
            pid,
            exited,
            released,
            notice: Some(exit_rx),
        }))
    }
}

/// Handle to a shell-launched process. The OS handle itself is owned and
/// closed by the waiter thread.
#[derive(Debug)]
struct ShellProcess {
    pid: Option<u32>,
    exited: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
    notice: Option<ExitNotice>,
}

impl ProcessHandle for ShellProcess {
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
        self.released.store(true, Ordering::SeqCst);
        debug!(pid = ?self.pid, "process handle released");
    }
}
