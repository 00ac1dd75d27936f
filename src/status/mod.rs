// src/status/mod.rs

//! The status surface: a long-lived icon + short text + a couple of menu
//! actions that tell the user the relay is still waiting.
//!
//! The relay composes and truncates the text itself ([`text`]); a surface
//! only has to display what it is given. [`tray`] is the surface on Windows,
//! [`console`] everywhere else.

pub mod console;
pub mod text;
pub mod tray;

pub use console::ConsoleSurface;

use tokio::sync::mpsc;

use crate::engine::RelayEvent;
use crate::icon::Icon;

/// User-triggered actions a surface can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusAction {
    /// List the primary process's visible windows.
    ShowDetails,
    /// Stop relaying without launching the follow-up.
    Exit,
}

impl StatusAction {
    pub fn label(self) -> &'static str {
        match self {
            StatusAction::ShowDetails => "Show details",
            StatusAction::Exit => "Exit AppRelay",
        }
    }
}

/// What the relay needs from a status surface.
///
/// Invoked actions are reported back as
/// [`RelayEvent::ActionInvoked`](crate::engine::RelayEvent::ActionInvoked)
/// on the runtime's event channel, which the surface is handed at
/// construction.
pub trait StatusSurface: Send {
    /// Make the surface visible with its initial icon and text.
    fn show(&mut self, icon: &Icon, text: &str);

    /// Replace the short text. Callers truncate before calling.
    fn set_text(&mut self, text: &str);

    fn register_action(&mut self, action: StatusAction);

    /// Synchronous, user-visible error notification.
    fn notify_error(&mut self, title: &str, message: &str);

    fn show_details(&mut self, title: &str, lines: &[String]);

    fn hide(&mut self);

    /// Free everything the surface holds. Called once, after `hide`.
    fn dispose(&mut self);
}

/// The status surface for the current platform. Invoked actions are sent on
/// `events`.
pub fn platform_surface(
    events: mpsc::Sender<RelayEvent>,
    text_limit: usize,
) -> Box<dyn StatusSurface> {
    #[cfg(windows)]
    {
        let _ = text_limit;
        Box::new(tray::TraySurface::new(events))
    }
    #[cfg(not(windows))]
    {
        Box::new(ConsoleSurface::new(events, text_limit))
    }
}
