// src/census/win32.rs

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, TRUE};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
    IsWindowVisible,
};

use super::{WindowCensus, WindowInfo};
use crate::errors::{RelayError, Result};

/// `EnumWindows`-backed census.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32WindowCensus;

/// Accumulator handed to the enumeration callback through `LPARAM`.
///
/// Counting and listing share the callback so they cannot disagree on the
/// filter; `titles` is `None` when only the count is wanted.
struct Tally {
    pid: u32,
    count: usize,
    titles: Option<Vec<WindowInfo>>,
}

unsafe extern "system" fn tally_window(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let tally = unsafe { &mut *(lparam.0 as *mut Tally) };

    let mut owner = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut owner as *mut u32)) };

    if owner == tally.pid && unsafe { IsWindowVisible(hwnd) }.as_bool() {
        tally.count += 1;
        if let Some(titles) = tally.titles.as_mut() {
            titles.push(WindowInfo::from_title(unsafe { window_title(hwnd) }));
        }
    }

    TRUE
}

unsafe fn window_title(hwnd: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; len as usize + 1];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
    if copied <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buf[..copied as usize])
}

fn enumerate(pid: u32, with_titles: bool) -> Result<Tally> {
    let mut tally = Tally {
        pid,
        count: 0,
        titles: with_titles.then(Vec::new),
    };
    unsafe {
        EnumWindows(
            Some(tally_window),
            LPARAM(&mut tally as *mut Tally as isize),
        )
    }
    .map_err(|e| RelayError::Census(e.to_string()))?;
    Ok(tally)
}

impl WindowCensus for Win32WindowCensus {
    fn list_visible_windows(&self, pid: u32) -> Result<Vec<WindowInfo>> {
        Ok(enumerate(pid, true)?.titles.unwrap_or_default())
    }

    fn count_visible_windows(&self, pid: u32) -> Result<usize> {
        Ok(enumerate(pid, false)?.count)
    }
}
