// src/status/tray/mod.rs

//! Notification-area surface.
//!
//! The Win32 side lives in [`win32`]. What is decided here is portable: the
//! popup menu layout and how status text fits the fixed tooltip buffer.

use super::StatusAction;

#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub use win32::TraySurface;

/// Size of `NOTIFYICONDATAW::szTip`, terminating NUL included.
pub const TIP_CAPACITY: usize = 128;

/// Command id of the first menu entry.
pub const FIRST_COMMAND_ID: u32 = 100;

/// Encode `text` into a NUL-terminated tooltip buffer. Text that does not
/// fit is cut, never in the middle of a surrogate pair.
pub fn tip_buffer(text: &str) -> [u16; TIP_CAPACITY] {
    let mut units: Vec<u16> = text.encode_utf16().take(TIP_CAPACITY - 1).collect();
    if units
        .last()
        .is_some_and(|unit| (0xD800..=0xDBFF).contains(unit))
    {
        units.pop();
    }

    let mut buf = [0u16; TIP_CAPACITY];
    buf[..units.len()].copy_from_slice(&units);
    buf
}

/// Body of the details message box.
pub fn details_message(lines: &[String]) -> String {
    lines.join("\n")
}

/// The popup menu: one entry per registered action, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrayMenu {
    actions: Vec<StatusAction>,
}

impl TrayMenu {
    pub fn new(actions: &[StatusAction]) -> Self {
        Self {
            actions: actions.to_vec(),
        }
    }

    pub fn contains(&self, action: StatusAction) -> bool {
        self.actions.contains(&action)
    }

    /// `(command id, label)` per entry.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &'static str)> + '_ {
        (FIRST_COMMAND_ID..).zip(self.actions.iter().map(|a| a.label()))
    }

    /// The action behind a command id returned by the popup menu. `0` means
    /// the menu was dismissed.
    pub fn action_for_command(&self, id: u32) -> Option<StatusAction> {
        let index = id.checked_sub(FIRST_COMMAND_ID)?;
        self.actions.get(index as usize).copied()
    }
}
